use anyhow::Result;
use pollytalk_core::voice::resolver::{self, VoiceProfile};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct VoiceRow<'a> {
    #[serde(flatten)]
    profile: &'a VoiceProfile,
    single_voice: bool,
}

fn rows() -> Vec<VoiceRow<'static>> {
    resolver::supported_locales()
        .iter()
        .map(|profile| VoiceRow {
            profile,
            single_voice: resolver::has_single_voice(profile.locale_id),
        })
        .collect()
}

pub fn table() -> String {
    let mut out = format!(
        "{:<7} {:<10} {:<10} {:<8} {}",
        "LOCALE", "FEMALE", "MALE", "POLLY", "NAME"
    );
    for row in rows() {
        let p = row.profile;
        out.push('\n');
        out.push_str(&format!(
            "{:<7} {:<10} {:<10} {:<8} {}{}",
            p.locale_id,
            p.female_voice_id,
            p.male_voice_id,
            p.cloud_language_code,
            p.display_name,
            if row.single_voice { " *" } else { "" }
        ));
    }
    out.push_str("\n* single voice, the voice toggle has no effect");
    out
}

pub fn json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&rows())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_every_locale() {
        let table = table();
        for profile in resolver::supported_locales() {
            assert!(table.contains(profile.locale_id));
        }
        assert!(table.contains("Zhiyu      Zhiyu      cmn-CN"));
    }

    #[test]
    fn json_marks_single_voice_locales() {
        let value: serde_json::Value = serde_json::from_str(&json().unwrap()).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 17);

        let korean = rows
            .iter()
            .find(|r| r["locale_id"] == "ko-KR")
            .unwrap();
        assert_eq!(korean["single_voice"], true);
        assert_eq!(korean["female_voice_id"], "Seoyeon");
    }
}
