use super::{Inference, Sample};
use crate::error::Result;
use crate::ir::{TypeConfigurationObject, TypeKind, ValueTypeConfiguration};

pub(super) fn observe_object<V: Sample + ?Sized>(
    inf: &mut Inference<'_>,
    entries: Vec<(&str, &V)>,
) -> Result<ValueTypeConfiguration> {
    let mut node = inf.leaf(TypeKind::Object);
    // empty objects stay an opaque `object`
    if !entries.is_empty() {
        node.object_keys = Some(observe_fields(inf, entries)?);
    }
    Ok(node)
}

/// Field-mapping rule: every key is inferred on its own, in insertion order.
pub(super) fn observe_fields<V: Sample + ?Sized>(
    inf: &mut Inference<'_>,
    entries: Vec<(&str, &V)>,
) -> Result<TypeConfigurationObject> {
    let mut fields = TypeConfigurationObject::with_capacity(entries.len());
    for (key, value) in entries {
        let ty = inf.descend(key, |inf| inf.observe_value(value))?;
        fields.insert(key.to_owned(), ty);
    }
    Ok(fields)
}
