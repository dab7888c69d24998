use crate::decoder::Attributes;
use crate::fields::{FieldGroup, ValueSource, FIELD_GROUPS};
use crate::query::QueryParams;

/// Ordered `(field, value)` pairs covering every output field except `Record ID`.
pub type Reconciled = Vec<(&'static str, String)>;

/// Merges decoded cookie attributes and page URL parameters into the fixed output layout.
pub fn reconcile(attrs: &Attributes, query: &QueryParams) -> Reconciled {
    let mut out = Reconciled::with_capacity(crate::fields::field_count());
    for group in FIELD_GROUPS.iter() {
        resolve_group(group, attrs, query, &mut out);
    }
    out
}

pub fn resolve_group(group: &FieldGroup, attrs: &Attributes, query: &QueryParams, out: &mut Reconciled) {
    for &field in group.fields {
        let value = match group.source {
            ValueSource::Attributes => attrs.get(field),
            ValueSource::QueryThenAttributes => query.get(field).or_else(|| attrs.get(field)),
        };
        out.push((field, value.cloned().unwrap_or_default()));
    }
}
