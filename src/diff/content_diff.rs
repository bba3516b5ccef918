//! Field-level content deltas, built independently of status.

use super::ContentDiff;
use crate::content::normalize;
use crate::model::AppObject;

fn line_count(text: &str) -> usize {
    text.lines().filter(|l| !l.trim().is_empty()).count()
}

/// Compare name, description, code payload, business logic and structure
/// counts of two versions of the same object.
///
/// The code payload is the normalized document body, so version
/// bookkeeping never shows up as a code change.
#[must_use]
pub fn build_content_diff(old: &AppObject, new: &AppObject) -> ContentDiff {
    let mut diff = ContentDiff::default();
    let (o, n) = (old.core(), new.core());

    if o.name != n.name {
        diff.push("name", format!("renamed '{}' -> '{}'", o.name, n.name));
    }
    if o.description.trim() != n.description.trim() {
        diff.push("description", "description changed");
    }

    if o.raw_document != n.raw_document {
        let (old_code, new_code) = (normalize(&o.raw_document), normalize(&n.raw_document));
        if old_code != new_code {
            if old_code.is_empty() || new_code.is_empty() {
                diff.push("code", "code changed");
            } else {
                let delta = new_code.len() as i64 - old_code.len() as i64;
                diff.push("code", format!("code changed ({delta:+} bytes)"));
            }
        }
    }

    let (old_logic, new_logic) = (old.business_logic(), new.business_logic());
    if old_logic.trim() != new_logic.trim() {
        let summary = match (old_logic.trim().is_empty(), new_logic.trim().is_empty()) {
            (true, false) => "business logic added".to_string(),
            (false, true) => "business logic removed".to_string(),
            _ => format!(
                "business logic modified ({} -> {} lines)",
                line_count(old_logic),
                line_count(new_logic)
            ),
        };
        diff.push("business_logic", summary);
    }

    let new_counts = new.structure_counts();
    for (field, before) in old.structure_counts() {
        if let Some((_, after)) = new_counts.iter().find(|(f, _)| *f == field)
            && before != *after
        {
            diff.push(field, format!("{field}: {before} -> {after}"));
        }
    }

    let (old_roles, new_roles) = (old.security_roles().len(), new.security_roles().len());
    if old_roles != new_roles {
        diff.push(
            "security_roles",
            format!("security roles: {old_roles} -> {new_roles}"),
        );
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectCore, ObjectType, RuleInput, SimpleObject};

    fn rule(name: &str, logic: &str, raw: &str) -> AppObject {
        let mut obj = SimpleObject::new(
            ObjectCore::new("r-1", name, ObjectType::ExpressionRule).with_raw_document(raw),
        );
        obj.business_logic = logic.to_string();
        AppObject::Simple(obj)
    }

    #[test]
    fn test_identical_objects_have_no_deltas() {
        let a = rule("A", "1 + 1", "<rule>1 + 1</rule>");
        assert!(build_content_diff(&a, &a.clone()).is_empty());
    }

    #[test]
    fn test_version_only_change_is_not_a_code_change() {
        let a = rule("A", "x", "<r><versionUuid>v1</versionUuid><d>x</d></r>");
        let b = rule("A", "x", "<r><versionUuid>v2</versionUuid><d>x</d></r>");
        assert!(build_content_diff(&a, &b).is_empty());
    }

    #[test]
    fn test_deltas_cover_each_field() {
        let a = rule("A", "1", "<r>1</r>");
        let mut b = rule("B", "if(x,\n 1,\n 2)", "<r>if(x, 1, 2)</r>");
        if let AppObject::Simple(s) = &mut b {
            s.inputs.push(RuleInput {
                name: "x".to_string(),
                input_type: "Boolean".to_string(),
            });
        }
        let diff = build_content_diff(&a, &b);
        let fields: Vec<_> = diff.deltas.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "code", "business_logic", "inputs"]);
        assert!(diff.deltas[1].summary.contains("+10 bytes"));
        assert!(diff.summary().contains("inputs: 0 -> 1"));
    }
}
