//! Render digests
//!
//! Everything hashed goes through [`canonical_json`] first, so key order in the
//! input never changes a digest.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::schema::Resume;
use crate::styles::Template;
use crate::surface::LayoutCommand;

/// Serializes with object keys sorted at every depth and no whitespace.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut v = serde_json::to_value(value)?;
    sort_keys(&mut v);
    serde_json::to_string(&v)
}

fn sort_keys(v: &mut Value) {
    match v {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, mut value) in entries {
                sort_keys(&mut value);
                map.insert(key, value);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

fn sha256_hex(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b":");
        }
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Digest of a recorded layout command stream.
pub fn layout_digest(commands: &[LayoutCommand]) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(&[&canonical_json(&commands)?]))
}

/// Identifies a render job: template id and version, validated resume, engine version.
/// Re-running the same job must reproduce the same layout digest.
pub fn compute_job_hash(template: &Template, resume: &Resume, engine_version: &str) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(&[
        &template.id,
        &template.template_version,
        &canonical_json(resume)?,
        engine_version,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::{FontDecoration, TextStyle};
    use serde_json::json;

    fn demo() -> Resume {
        Resume::from_value(&serde_json::from_str(include_str!("../demos/resume.json")).unwrap()).unwrap()
    }

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": {"y": 2, "b": 3}, "m": [{"k": 1, "c": 2}]});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":{"b":3,"y":2},"m":[{"c":2,"k":1}],"z":1}"#);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(sha256_hex(&["abc"]), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(sha256_hex(&["a", "bc"]), sha256_hex(&["a:bc"]));
    }

    #[test]
    fn test_layout_digest_tracks_content() {
        let style = TextStyle { font: "Body".into(), style: FontDecoration::Regular, size: 8.0, color: None };
        let a = vec![
            LayoutCommand::SetStyle { style },
            LayoutCommand::Cell { width: 190.0, height: 4.0, text: "Ada".into() },
        ];
        let mut b = a.clone();
        assert_eq!(layout_digest(&a).unwrap(), layout_digest(&b).unwrap());
        b.push(LayoutCommand::Cell { width: 190.0, height: 5.0, text: String::new() });
        assert_ne!(layout_digest(&a).unwrap(), layout_digest(&b).unwrap());
    }

    #[test]
    fn test_job_hash_depends_on_template_version() {
        let resume = demo();
        let mut template = Template::modern().unwrap();
        let h1 = compute_job_hash(&template, &resume, "1.0.0").unwrap();
        assert_eq!(h1, compute_job_hash(&template, &resume, "1.0.0").unwrap());
        assert_ne!(h1, compute_job_hash(&template, &resume, "1.1.0").unwrap());

        template.template_version = "9.9.9".to_string();
        assert_ne!(h1, compute_job_hash(&template, &resume, "1.0.0").unwrap());
    }
}
