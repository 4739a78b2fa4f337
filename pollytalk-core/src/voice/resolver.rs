//! Static mapping from locale identifiers to Polly voices and language codes

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

/// Locale used whenever a lookup misses the table.
pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VoiceGender {
    #[default]
    Female,
    Male,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceProfile {
    pub locale_id: &'static str,
    pub display_name: &'static str,
    pub female_voice_id: &'static str,
    pub male_voice_id: &'static str,
    pub cloud_language_code: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicePair {
    pub female: &'static str,
    pub male: &'static str,
}

impl VoicePair {
    pub fn for_gender(&self, gender: VoiceGender) -> &'static str {
        match gender {
            VoiceGender::Female => self.female,
            VoiceGender::Male => self.male,
        }
    }
}

const fn profile(
    locale_id: &'static str,
    display_name: &'static str,
    female_voice_id: &'static str,
    male_voice_id: &'static str,
    cloud_language_code: &'static str,
) -> VoiceProfile {
    VoiceProfile {
        locale_id,
        display_name,
        female_voice_id,
        male_voice_id,
        cloud_language_code,
    }
}

/// Ordered the way the locale selector presents them.
static VOICE_PROFILES: [VoiceProfile; 17] = [
    profile("en-US", "English (US)", "Salli", "Justin", "en-US"),
    profile("en-GB", "English (UK)", "Emma", "Brian", "en-GB"),
    profile("en-AU", "English (Australia)", "Nicole", "Russell", "en-AU"),
    profile("zh-CN", "中文 (Chinese)", "Zhiyu", "Zhiyu", "cmn-CN"),
    profile("fr-FR", "Français (French)", "Celine", "Mathieu", "fr-FR"),
    profile("es-ES", "Español (Spanish)", "Conchita", "Enrique", "es-ES"),
    profile("es-MX", "Español MX (Spanish Mexico)", "Mia", "Andres", "es-MX"),
    profile("de-DE", "Deutsch (German)", "Marlene", "Hans", "de-DE"),
    profile("it-IT", "Italiano (Italian)", "Carla", "Giorgio", "it-IT"),
    profile("ja-JP", "日本語 (Japanese)", "Mizuki", "Takumi", "ja-JP"),
    profile("ko-KR", "한국어 (Korean)", "Seoyeon", "Seoyeon", "ko-KR"),
    profile("pt-BR", "Português BR (Portuguese Brazil)", "Vitoria", "Ricardo", "pt-BR"),
    profile("pt-PT", "Português (Portuguese)", "Ines", "Cristiano", "pt-PT"),
    profile("pl-PL", "Polski (Polish)", "Ewa", "Jacek", "pl-PL"),
    profile("ru-RU", "Русский (Russian)", "Tatyana", "Maxim", "ru-RU"),
    profile("tr-TR", "Türkçe (Turkish)", "Filiz", "Filiz", "tr-TR"),
    profile("hi-IN", "हिन्दी (Hindi)", "Aditi", "Aditi", "hi-IN"),
];

/// All known profiles in selector order.
pub fn supported_locales() -> &'static [VoiceProfile] {
    &VOICE_PROFILES
}

/// Strict lookup, `None` for unknown locales.
pub fn profile_for(locale_id: &str) -> Option<&'static VoiceProfile> {
    VOICE_PROFILES.iter().find(|p| p.locale_id == locale_id)
}

pub fn is_supported(locale_id: &str) -> bool {
    profile_for(locale_id).is_some()
}

/// Lookup that never fails: unknown locales resolve to the `en-US` entry.
fn profile_or_default(locale_id: &str) -> &'static VoiceProfile {
    match profile_for(locale_id) {
        Some(profile) => profile,
        None => {
            debug!(locale_id, "unknown locale, falling back to {DEFAULT_LOCALE}");
            &VOICE_PROFILES[0]
        }
    }
}

pub fn resolve_voices(locale_id: &str) -> VoicePair {
    let profile = profile_or_default(locale_id);
    VoicePair {
        female: profile.female_voice_id,
        male: profile.male_voice_id,
    }
}

pub fn resolve_voice(locale_id: &str, gender: VoiceGender) -> &'static str {
    resolve_voices(locale_id).for_gender(gender)
}

pub fn resolve_language_code(locale_id: &str) -> &'static str {
    profile_or_default(locale_id).cloud_language_code
}

/// True when the locale exposes the same voice for both genders. Unknown
/// locales report `false`; this query does not fall back.
pub fn has_single_voice(locale_id: &str) -> bool {
    profile_for(locale_id)
        .map(|p| p.female_voice_id == p.male_voice_id)
        .unwrap_or(false)
}

/// Gender toggle value that is actually usable for `locale_id`. Single-voice
/// locales always report `Female`.
pub fn effective_gender(locale_id: &str, requested: VoiceGender) -> VoiceGender {
    if has_single_voice(locale_id) {
        VoiceGender::Female
    } else {
        requested
    }
}
