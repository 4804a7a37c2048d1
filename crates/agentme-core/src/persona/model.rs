//! Persona domain model.
//!
//! A persona describes the assistant the user wants to talk to: who it is,
//! what it is for, who it serves, the domain it works in and how it speaks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Communication style of a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Creative,
    Analytical,
    Concise,
}

impl Tone {
    /// All tones, in the order the wizard offers them.
    pub const ALL: [Tone; 4] = [
        Tone::Professional,
        Tone::Creative,
        Tone::Analytical,
        Tone::Concise,
    ];

    /// Stable identifier used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Creative => "creative",
            Tone::Analytical => "analytical",
            Tone::Concise => "concise",
        }
    }

    /// Short label shown in the wizard.
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Professional => "정중하고 전문적인",
            Tone::Creative => "창의적이고 친근한",
            Tone::Analytical => "분석적이고 정확한",
            Tone::Concise => "간결하고 요약 위주",
        }
    }

    /// One-line hint shown next to the label in the wizard.
    pub fn summary(&self) -> &'static str {
        match self {
            Tone::Professional => "비즈니스 환경에 적합한 공식적인 톤",
            Tone::Creative => "아이디어 발굴과 브레인스토밍에 적합",
            Tone::Analytical => "데이터 분석과 정확한 정보 전달에 중점",
            Tone::Concise => "핵심만 빠르게 전달하는 효율적인 스타일",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "Unknown tone '{}': expected one of professional, creative, analytical, concise",
                    s
                )
            })
    }
}

/// Industry a persona works in.
///
/// The six known industries each have a dedicated expertise block in the
/// compiled prompt. Any other label is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Industry {
    Marketing,
    Software,
    HumanResources,
    Strategy,
    Sales,
    CustomerService,
    Other(String),
}

impl Industry {
    /// The known industries, in the order the wizard lists them.
    pub const KNOWN: [Industry; 6] = [
        Industry::Marketing,
        Industry::Software,
        Industry::HumanResources,
        Industry::Strategy,
        Industry::Sales,
        Industry::CustomerService,
    ];

    /// Maps a free-text label onto an industry. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "마케팅/광고" => Industry::Marketing,
            "IT/소프트웨어" => Industry::Software,
            "인사/채용" => Industry::HumanResources,
            "기획/전략" => Industry::Strategy,
            "영업/세일즈" => Industry::Sales,
            "고객서비스" => Industry::CustomerService,
            _ => Industry::Other(label.to_string()),
        }
    }

    /// The label as the user sees it.
    pub fn label(&self) -> &str {
        match self {
            Industry::Marketing => "마케팅/광고",
            Industry::Software => "IT/소프트웨어",
            Industry::HumanResources => "인사/채용",
            Industry::Strategy => "기획/전략",
            Industry::Sales => "영업/세일즈",
            Industry::CustomerService => "고객서비스",
            Industry::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Industry::Other(_))
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Industry {
    fn from(label: String) -> Self {
        Industry::from_label(&label)
    }
}

impl From<&str> for Industry {
    fn from(label: &str) -> Self {
        Industry::from_label(label)
    }
}

impl From<Industry> for String {
    fn from(industry: Industry) -> Self {
        match industry {
            Industry::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

/// A persona representing the assistant the user chats with.
///
/// `id` and `created` are assigned by the persona store on save. Field names
/// serialize in camelCase to match the stored layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Unique identifier
    pub id: String,
    /// Display name of the persona
    pub name: String,
    /// What the persona is for
    pub purpose: String,
    /// Communication style; `None` for records saved without one
    #[serde(default, deserialize_with = "lenient_tone")]
    pub tone: Option<Tone>,
    /// Stored tone label this build does not recognize, written back as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_tone: Option<String>,
    /// Who the persona serves
    pub target_user: String,
    /// Domain of expertise
    pub industry: Industry,
    /// Creation timestamp
    pub created: DateTime<Utc>,
}

/// Reads a tone, mapping unknown or empty strings to `None`.
pub(crate) fn lenient_tone<'de, D>(deserializer: D) -> Result<Option<Tone>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}
