use crate::{
    errors::GeoError,
    prompts::vision::photo_prompt,
    providers::ai::ImageData,
    registry::{TaskRegistry, PHOTO_ANALYSIS},
    util::round_to,
};
use serde::Serialize;
use tracing::{info, warn};

const KNOWN_CITIES: [&str; 8] = [
    "São Paulo",
    "Rio de Janeiro",
    "Porto Alegre",
    "Curitiba",
    "Belo Horizonte",
    "Brasília",
    "Salvador",
    "Fortaleza",
];

const CHARACTERISTIC_KEYWORDS: [&str; 8] = [
    "commercial",
    "residential",
    "high-end",
    "middle-class",
    "busy",
    "quiet",
    "modern",
    "historic",
];

const CERTAINTY_WORDS: [&str; 4] = ["clearly", "definitely", "obviously", "certainly"];
const UNCERTAINTY_WORDS: [&str; 4] = ["possibly", "might", "perhaps", "unclear"];

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Serialize)]
pub struct PhotoAnalysis {
    pub identified_location: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub characteristics: Vec<String>,
    pub property_value_estimate: Option<String>,
    pub similar_locations: Vec<String>,
    pub confidence_score: f64,
    pub full_analysis: String,
    pub success: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub mock: bool,
}

impl PhotoAnalysis {
    /// Derives the structured fields from the model's free-text analysis.
    pub fn from_text(text: String) -> Self {
        Self {
            identified_location: extract_location(&text),
            city: extract_city(&text),
            neighborhood: extract_neighborhood(&text),
            characteristics: extract_characteristics(&text),
            property_value_estimate: extract_value(&text),
            similar_locations: Vec::new(),
            confidence_score: confidence(&text),
            full_analysis: text,
            success: true,
            mock: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PhotoAnalyzer {
    registry: TaskRegistry,
}

impl PhotoAnalyzer {
    pub fn new(registry: TaskRegistry) -> Self {
        Self { registry }
    }

    pub fn is_enabled(&self) -> bool {
        self.registry.is_enabled(PHOTO_ANALYSIS)
    }

    /// Analyzes a base64-encoded photo (optionally a `data:` URI).
    pub async fn analyze_uploaded_photo(
        &self,
        image_base64: &str,
        analysis_type: &str,
    ) -> PhotoAnalysis {
        match self.analyze_with_model(image_base64, analysis_type).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Photo analysis unavailable, serving mock analysis: {e}");
                mock_photo_analysis()
            }
        }
    }

    async fn analyze_with_model(
        &self,
        image_base64: &str,
        analysis_type: &str,
    ) -> Result<PhotoAnalysis, GeoError> {
        let (provider, task) = self
            .registry
            .resolve(PHOTO_ANALYSIS)
            .ok_or_else(|| GeoError::MissingAiProvider(PHOTO_ANALYSIS.to_string()))?;
        let image = ImageData::from_base64(image_base64)?;
        let user_prompt = task
            .user_prompt
            .replace("{analysis_prompt}", photo_prompt(analysis_type));

        info!(
            "Analyzing uploaded {} photo ({analysis_type})",
            image.mime_type
        );
        let text = provider
            .generate_with_image(&task.system_prompt, &user_prompt, &image)
            .await?;
        Ok(PhotoAnalysis::from_text(text))
    }
}

/// The first line mentioning "appears to be" or "likely", when the text says
/// "appears to be" anywhere.
pub fn extract_location(text: &str) -> Option<String> {
    if !text.to_lowercase().contains("appears to be") {
        return None;
    }
    text.lines()
        .find(|line| {
            let lower = line.to_lowercase();
            lower.contains("appears to be") || lower.contains("likely")
        })
        .map(|line| line.trim().to_string())
}

pub fn extract_city(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    KNOWN_CITIES
        .iter()
        .find(|city| lower.contains(&city.to_lowercase()))
        .map(|city| city.to_string())
}

pub fn extract_neighborhood(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    (lower.contains("neighborhood") || lower.contains("bairro"))
        .then(|| "Identified in analysis".to_string())
}

/// Up to five characteristic keywords present in the text.
pub fn extract_characteristics(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    CHARACTERISTIC_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .take(5)
        .map(|keyword| keyword.to_string())
        .collect()
}

pub fn extract_value(text: &str) -> Option<String> {
    (text.contains("R$") || text.to_lowercase().contains("value"))
        .then(|| "Estimate available in analysis".to_string())
}

/// 0.5, plus 0.1 per certainty word and minus 0.1 per hedging word present, in [0, 1].
pub fn confidence(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let count = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count() as f64;
    let score = 0.5 + 0.1 * count(&CERTAINTY_WORDS) - 0.1 * count(&UNCERTAINTY_WORDS);
    round_to(score.clamp(0.0, 1.0), 2)
}

fn mock_photo_analysis() -> PhotoAnalysis {
    PhotoAnalysis {
        identified_location: Some("Appears to be Avenida Paulista, São Paulo".to_string()),
        city: Some("São Paulo".to_string()),
        neighborhood: Some("Bela Vista / Jardins region".to_string()),
        characteristics: ["commercial", "high-end", "busy", "modern", "well-maintained"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        property_value_estimate: Some("R$ 8,000 - R$ 12,000 per m²".to_string()),
        similar_locations: [
            "Rua Oscar Freire, São Paulo",
            "Avenida Atlântica, Rio de Janeiro",
            "Rua XV de Novembro, Curitiba",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        confidence_score: 0.75,
        full_analysis: "Mock Photo Analysis:

This appears to be Avenida Paulista in São Paulo, one of the city's most iconic streets.

Characteristics:
- High-end commercial area
- Excellent infrastructure
- Heavy pedestrian and vehicle traffic
- Mix of office buildings, retail, and cultural institutions
- Well-maintained streets and sidewalks

Property Value Estimate: R$ 8,000 - R$ 12,000 per m²

Economic Indicators: High income area, premium location

Similar Locations:
1. Rua Oscar Freire (São Paulo) - Luxury shopping district
2. Av. Atlântica (Rio de Janeiro) - Beachfront commercial area
3. Rua XV de Novembro (Curitiba) - Historic commercial center

Note: Enable Gemini API for real AI-powered photo analysis"
            .to_string(),
        success: true,
        mock: true,
    }
}
