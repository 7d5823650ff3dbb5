use super::{Inference, Sample};
use crate::error::Result;
use crate::ir::{TypeKind, ValueTypeConfiguration};

/// Sequence rule: the first element decides the element type.
///
/// Optionality comes from the policy, not from the element, so `[null]` is a
/// required `unknown[]` while `[]` is an optional one.
pub(super) fn observe_sequence<V: Sample + ?Sized>(
    inf: &mut Inference<'_>,
    first: Option<&V>,
) -> Result<ValueTypeConfiguration> {
    let Some(first) = first else {
        return Ok(ValueTypeConfiguration {
            optional: true,
            is_array: true,
            ..inf.leaf(TypeKind::Unknown)
        });
    };

    let element = inf.descend("0", |inf| inf.observe_value(first))?;
    Ok(ValueTypeConfiguration {
        kind: element.kind,
        label: element.label,
        optional: inf.options.force_optional,
        is_array: true,
        object_keys: element.object_keys,
    })
}
