use nomo_core::RiskBand;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language '{0}' (expected en or zh)")]
pub struct LocaleError(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    English,
    Chinese,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Chinese => "zh",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::English),
            "zh" | "zh-cn" | "zh-hans" | "chinese" | "中文" => Ok(Locale::Chinese),
            other => Err(LocaleError(other.to_string())),
        }
    }
}

/// Fixed strings for one locale.
#[derive(Debug)]
pub struct Labels {
    pub prompt: &'static str,
    pub headline: &'static str,
    pub risk_level: &'static str,
    pub axis: &'static str,
    pub contributions: &'static str,
    pub intercept: &'static str,
    /// Separator between a caption and its value.
    pub colon: &'static str,
    pub low: &'static str,
    pub moderate: &'static str,
    pub high: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
}

impl Labels {
    pub fn band(&self, band: RiskBand) -> &'static str {
        match band {
            RiskBand::Low => self.low,
            RiskBand::Moderate => self.moderate,
            RiskBand::High => self.high,
        }
    }

    pub fn flag(&self, present: bool) -> &'static str {
        if present {
            self.yes
        } else {
            self.no
        }
    }
}

static ENGLISH: Labels = Labels {
    prompt: "Enter the values below to estimate the probability of AHR.",
    headline: "Predicted Probability of AHR",
    risk_level: "Risk Level",
    axis: "AHR Risk (%)",
    contributions: "Contributions to the logit",
    intercept: "Intercept",
    colon: ": ",
    low: "Low risk",
    moderate: "Moderate risk",
    high: "High risk",
    yes: "Yes",
    no: "No",
};

static CHINESE: Labels = Labels {
    prompt: "请输入以下参数以估算气道高反应性的概率：",
    headline: "预测AHR概率",
    risk_level: "风险等级",
    axis: "AHR风险（%）",
    contributions: "各参数对logit的贡献",
    intercept: "截距",
    colon: "：",
    low: "低风险",
    moderate: "中等风险",
    high: "高风险",
    yes: "是",
    no: "否",
};

pub fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::English => &ENGLISH,
        Locale::Chinese => &CHINESE,
    }
}

// (feature key, English, Chinese)
const FEATURE_LABELS: &[(&str, &str, &str)] = &[
    ("FeNO", "FeNO (ppb)", "FeNO (ppb)"),
    ("RR", "Respiratory Rate (bpm)", "呼吸频率 (次/分)"),
    ("PTEF", "PTEF/TEF25 (%)", "PTEF/TEF25 (%)"),
    ("Wheeze", "Wheeze", "是否存在喘息"),
    ("Age", "Age (months)", "年龄（月）"),
    ("FamilyHistory", "Family history of asthma", "哮喘家族史"),
    ("Rhinitis", "Allergic rhinitis", "过敏性鼻炎"),
    ("Allergy", "History of allergy", "过敏史"),
    ("TPTEF_TE", "TPTEF/TE (%)", "TPTEF/TE (%)"),
];

/// Form label for a feature; unknown keys are shown as-is.
pub fn feature_label<'a>(locale: Locale, key: &'a str) -> &'a str {
    FEATURE_LABELS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, en, zh)| match locale {
            Locale::English => *en,
            Locale::Chinese => *zh,
        })
        .unwrap_or(key)
}

/// Reads a yes/no answer in either language.
pub fn parse_yes_no(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "是" | "有" => Some(true),
        "no" | "n" | "false" | "0" | "否" | "无" => Some(false),
        _ => None,
    }
}
