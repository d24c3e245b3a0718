//! Skin condition classes
//!
//! Output index order of the HAM10000-style classifier:
//! 0: akiec, 1: bcc, 2: bkl, 3: df, 4: mel, 5: nv, 6: vasc

use serde::Serialize;

/// Number of classes the model scores
pub const NUM_CLASSES: usize = 7;

/// Skin condition category predicted by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiseaseClass {
    ActinicKeratoses,
    BasalCellCarcinoma,
    BenignKeratosis,
    Dermatofibroma,
    Melanoma,
    MelanocyticNevi,
    VascularLesions,
}

/// All classes in model output order
pub const ALL_CLASSES: [DiseaseClass; NUM_CLASSES] = [
    DiseaseClass::ActinicKeratoses,
    DiseaseClass::BasalCellCarcinoma,
    DiseaseClass::BenignKeratosis,
    DiseaseClass::Dermatofibroma,
    DiseaseClass::Melanoma,
    DiseaseClass::MelanocyticNevi,
    DiseaseClass::VascularLesions,
];

impl DiseaseClass {
    pub fn from_index(idx: usize) -> Option<Self> {
        ALL_CLASSES.get(idx).copied()
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Short class code, e.g. "mel"
    pub fn code(&self) -> &'static str {
        match self {
            DiseaseClass::ActinicKeratoses => "akiec",
            DiseaseClass::BasalCellCarcinoma => "bcc",
            DiseaseClass::BenignKeratosis => "bkl",
            DiseaseClass::Dermatofibroma => "df",
            DiseaseClass::Melanoma => "mel",
            DiseaseClass::MelanocyticNevi => "nv",
            DiseaseClass::VascularLesions => "vasc",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            DiseaseClass::ActinicKeratoses => "Actinic keratoses",
            DiseaseClass::BasalCellCarcinoma => "Basal cell carcinoma",
            DiseaseClass::BenignKeratosis => "Benign keratosis",
            DiseaseClass::Dermatofibroma => "Dermatofibroma",
            DiseaseClass::Melanoma => "Melanoma",
            DiseaseClass::MelanocyticNevi => "Melanocytic nevi",
            DiseaseClass::VascularLesions => "Vascular lesions",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        ALL_CLASSES.iter().copied().find(|c| c.code() == code)
    }

    pub fn info(&self) -> &'static ConditionInfo {
        &CONDITION_INFO[self.index()]
    }
}

/// How urgently a condition should be looked at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
        }
    }
}

/// Patient-facing description of a condition
#[derive(Debug)]
pub struct ConditionInfo {
    pub full_name: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub recommendations: [&'static str; 4],
}

// Indexed like ALL_CLASSES
static CONDITION_INFO: [ConditionInfo; NUM_CLASSES] = [
    ConditionInfo {
        full_name: "Actinic keratoses: precancerous lesions",
        severity: Severity::Moderate,
        description: "Rough, scaly patches on skin caused by years of sun exposure. Considered precancerous and should be treated.",
        recommendations: [
            "Consult with a dermatologist for treatment options",
            "Use daily sunscreen (SPF 30+)",
            "Wear protective clothing when outdoors",
            "Regular skin checks to monitor progression",
        ],
    },
    ConditionInfo {
        full_name: "Basal cell carcinoma: type of skin cancer",
        severity: Severity::Moderate,
        description: "The most common form of skin cancer, usually caused by sun exposure. Generally slow-growing and treatable.",
        recommendations: [
            "Schedule an appointment with a dermatologist",
            "Protect the area from sun exposure",
            "Use broad-spectrum sunscreen daily",
            "Avoid picking or scratching the area",
        ],
    },
    ConditionInfo {
        full_name: "Benign keratosis: non-cancerous growth",
        severity: Severity::Low,
        description: "A non-cancerous skin growth that is usually harmless. Common in older adults.",
        recommendations: [
            "Consult with a dermatologist if it changes or becomes irritated",
            "Protect skin from excessive sun exposure",
            "Regular skin monitoring is recommended",
            "Treatment is usually not necessary unless for cosmetic reasons",
        ],
    },
    ConditionInfo {
        full_name: "Dermatofibroma: benign skin nodule",
        severity: Severity::Low,
        description: "A common benign skin growth, usually firm to the touch. Generally harmless and does not require treatment.",
        recommendations: [
            "No treatment necessary unless it becomes bothersome",
            "Avoid scratching or irritating the area",
            "Consult a dermatologist if it changes or causes discomfort",
            "Removal is possible if desired for cosmetic reasons",
        ],
    },
    ConditionInfo {
        full_name: "Melanoma: dangerous skin cancer",
        severity: Severity::High,
        description: "A type of skin cancer that develops in melanocytes. Early detection is crucial for successful treatment.",
        recommendations: [
            "Consult a dermatologist immediately for professional evaluation",
            "Avoid sun exposure and use SPF 50+ sunscreen",
            "Monitor the area for any changes in size, shape, or color",
            "Do not attempt self-treatment",
        ],
    },
    ConditionInfo {
        full_name: "Melanocytic nevi: benign mole",
        severity: Severity::Low,
        description: "A benign (non-cancerous) mole formed by melanocytes. Generally harmless but should be monitored for changes.",
        recommendations: [
            "Monitor the mole for any changes in size, shape, or color",
            "Use sunscreen to protect your skin",
            "Schedule regular skin checks with a dermatologist",
            "Take photos to track any changes over time",
        ],
    },
    ConditionInfo {
        full_name: "Vascular lesions: abnormal blood vessels",
        severity: Severity::Low,
        description: "Abnormalities in blood vessels that appear on the skin. Usually benign but may require medical evaluation.",
        recommendations: [
            "Consult a dermatologist for proper diagnosis",
            "Avoid trauma to the affected area",
            "Monitor for any changes in size or appearance",
            "Treatment options are available if desired",
        ],
    },
];
