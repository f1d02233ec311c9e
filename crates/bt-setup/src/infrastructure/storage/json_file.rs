//! JSON helpers shared by the descriptor and state file adapters.
//!
//! Engine-written `.uproject` files are tab-indented and keep their keys in
//! authoring order. Rendering through [`to_engine_json`] keeps diffs of
//! those files limited to the values this tool actually changes.

use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

/// Renders `value` with one tab per indentation level.
pub fn to_engine_json(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes `contents` to `path`, creating missing parent directories.
pub fn write_creating_dirs(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    std::fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_engine_json_indents_with_tabs() {
        let value = json!({ "FileVersion": 3, "Plugins": [] });

        let text = to_engine_json(&value).expect("render");

        assert_eq!(text, "{\n\t\"FileVersion\": 3,\n\t\"Plugins\": []\n}");
    }

    #[test]
    fn test_to_engine_json_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"Zeta":1,"Alpha":2}"#).expect("parse");

        let text = to_engine_json(&value).expect("render");

        let zeta = text.find("Zeta").expect("zeta");
        let alpha = text.find("Alpha").expect("alpha");
        assert!(zeta < alpha);
    }
}
