//! Business-potential comparison across Brazilian cities, scored from a built-in
//! profile table.

use crate::util::round_to;
use serde::Serialize;
use serde_json::Value;

const MAX_CITIES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Competition {
    Low,
    Medium,
    MediumHigh,
    High,
}

impl Competition {
    /// Weaker competition scores higher.
    pub fn score(self) -> f64 {
        match self {
            Competition::Low => 20.0,
            Competition::Medium => 12.0,
            Competition::MediumHigh => 8.0,
            Competition::High => 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CityProfile {
    pub name: &'static str,
    pub population_millions: f64,
    pub avg_income: u32,
    pub gdp_per_capita: u32,
    pub competition: Competition,
    pub saturation_pct: u32,
    pub growth_rate_pct: f64,
    pub top_neighborhoods: &'static [&'static str],
    pub strengths: &'static [&'static str],
    pub challenges: &'static [&'static str],
}

pub const CITY_PROFILES: [CityProfile; 5] = [
    CityProfile {
        name: "São Paulo",
        population_millions: 12.3,
        avg_income: 4200,
        gdp_per_capita: 58000,
        competition: Competition::High,
        saturation_pct: 65,
        growth_rate_pct: 1.8,
        top_neighborhoods: &["Jardins", "Pinheiros", "Vila Mariana", "Mooca"],
        strengths: &["Largest market", "High income", "Diverse population"],
        challenges: &["High competition", "High costs", "Traffic"],
    },
    CityProfile {
        name: "Rio de Janeiro",
        population_millions: 6.7,
        avg_income: 3800,
        gdp_per_capita: 52000,
        competition: Competition::MediumHigh,
        saturation_pct: 55,
        growth_rate_pct: 1.2,
        top_neighborhoods: &["Ipanema", "Leblon", "Barra da Tijuca", "Botafogo"],
        strengths: &["Tourism", "Beach lifestyle", "Culture"],
        challenges: &["Security", "Economic volatility"],
    },
    CityProfile {
        name: "Porto Alegre",
        population_millions: 1.4,
        avg_income: 3400,
        gdp_per_capita: 48000,
        competition: Competition::Medium,
        saturation_pct: 45,
        growth_rate_pct: 2.2,
        top_neighborhoods: &["Moinhos de Vento", "Bom Fim", "Petrópolis"],
        strengths: &["Lower competition", "Quality of life", "Growing market"],
        challenges: &["Smaller market", "Seasonal economy"],
    },
    CityProfile {
        name: "Curitiba",
        population_millions: 1.9,
        avg_income: 3600,
        gdp_per_capita: 50000,
        competition: Competition::Medium,
        saturation_pct: 48,
        growth_rate_pct: 2.5,
        top_neighborhoods: &["Batel", "Água Verde", "Centro Cívico"],
        strengths: &["Urban planning", "Quality of life", "Technology hub"],
        challenges: &["Weather", "Conservative market"],
    },
    CityProfile {
        name: "Belo Horizonte",
        population_millions: 2.5,
        avg_income: 3300,
        gdp_per_capita: 46000,
        competition: Competition::Medium,
        saturation_pct: 50,
        growth_rate_pct: 2.0,
        top_neighborhoods: &["Savassi", "Lourdes", "Funcionários"],
        strengths: &["Strategic location", "Food culture", "Universities"],
        challenges: &["Infrastructure", "Public transport"],
    },
];

pub fn find_profile(city: &str) -> Option<&'static CityProfile> {
    CITY_PROFILES.iter().find(|profile| profile.name == city)
}

/// `50 + min(3·pop, 20) + min(income/200, 15) + competition + 3·growth`, capped at 100.
pub fn city_score(
    population_millions: f64,
    avg_income: u32,
    competition: Competition,
    growth_rate_pct: f64,
) -> f64 {
    let total = 50.0
        + (population_millions * 3.0).min(20.0)
        + (f64::from(avg_income) / 200.0).min(15.0)
        + competition.score()
        + growth_rate_pct * 3.0;
    round_to(total.min(100.0), 1)
}

pub fn recommendation(score: f64, business_type: &str) -> String {
    if score >= 85.0 {
        format!("Excellent choice for {business_type}. High potential, act quickly.")
    } else if score >= 70.0 {
        format!("Good opportunity for {business_type}. Balanced risk-reward.")
    } else if score >= 60.0 {
        "Moderate potential. Consider if you have local advantage.".to_string()
    } else {
        "Challenging market. Requires strong differentiation.".to_string()
    }
}

fn medal(rank: usize) -> &'static str {
    match rank {
        1 => "🥇",
        2 => "🥈",
        3 => "🥉",
        _ => "",
    }
}

/// Formats an amount in reais with thousands separators, e.g. `R$ 4,200`.
fn reais(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("R$ {grouped}")
}

#[derive(Debug, Clone, Serialize)]
pub struct CityResult {
    pub city: String,
    pub score: f64,
    pub population: String,
    pub avg_income: String,
    pub gdp_per_capita: String,
    pub competition_level: Competition,
    pub market_saturation: String,
    pub growth_rate: String,
    pub opportunity_areas: Vec<String>,
    pub strengths: Vec<String>,
    pub challenges: Vec<String>,
    pub recommendation: String,
    pub rank: usize,
    pub medal: &'static str,
}

impl CityResult {
    fn from_profile(profile: &CityProfile, business_type: &str) -> Self {
        let score = city_score(
            profile.population_millions,
            profile.avg_income,
            profile.competition,
            profile.growth_rate_pct,
        );
        let owned =
            |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            city: profile.name.to_string(),
            score,
            population: format!("{}M", profile.population_millions),
            avg_income: reais(profile.avg_income),
            gdp_per_capita: reais(profile.gdp_per_capita),
            competition_level: profile.competition,
            market_saturation: format!("{}%", profile.saturation_pct),
            growth_rate: format!("{:.1}%", profile.growth_rate_pct),
            opportunity_areas: owned(profile.top_neighborhoods),
            strengths: owned(profile.strengths),
            challenges: owned(profile.challenges),
            recommendation: recommendation(score, business_type),
            rank: 0,
            medal: "",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CityComparison {
    pub comparison_type: String,
    pub cities_analyzed: usize,
    pub criteria: Value,
    pub results: Vec<CityResult>,
    pub summary: String,
    pub success: bool,
}

/// Scores the first ten requested cities that have a known profile, best first.
pub fn compare_cities(cities: &[String], criteria: Value, business_type: &str) -> CityComparison {
    let mut results: Vec<CityResult> = cities
        .iter()
        .take(MAX_CITIES)
        .filter_map(|city| find_profile(city))
        .map(|profile| CityResult::from_profile(profile, business_type))
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (i, result) in results.iter_mut().enumerate() {
        result.rank = i + 1;
        result.medal = medal(i + 1);
    }

    CityComparison {
        comparison_type: business_type.to_string(),
        cities_analyzed: results.len(),
        criteria,
        summary: summary(&results, business_type),
        results,
        success: true,
    }
}

fn summary(results: &[CityResult], business_type: &str) -> String {
    let Some(top) = results.first() else {
        return "No cities to compare".to_string();
    };
    format!(
        "Multi-City Analysis Summary for {business_type}:\n\n\
         Top Choice: {} (Score: {}/100)\n\
         - Best balance of market size, income, and opportunity\n\
         - {}\n\n\
         All {} cities analyzed offer viable opportunities, \
         but differ significantly in competition level and market maturity.\n\n\
         Consider: Market entry strategy, local partnerships, and timing.",
        top.city,
        top.score,
        top.recommendation,
        results.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(cities: &[&str]) -> Vec<String> {
        cities.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn ranks_known_cities_and_skips_unknown() {
        let comparison = compare_cities(
            &names(&["Porto Alegre", "Atlantis", "São Paulo", "Curitiba"]),
            json!({}),
            "cafe",
        );
        assert_eq!(comparison.cities_analyzed, 3);
        let order: Vec<&str> = comparison.results.iter().map(|r| r.city.as_str()).collect();
        assert_eq!(order, vec!["São Paulo", "Curitiba", "Porto Alegre"]);
        assert_eq!(comparison.results[0].score, 95.4);
        assert_eq!(comparison.results[0].medal, "🥇");
        assert_eq!(comparison.results[2].medal, "🥉");
        assert_eq!(comparison.results[2].rank, 3);
        assert!(comparison.summary.contains("Top Choice: São Paulo (Score: 95.4/100)"));
    }

    #[test]
    fn profile_fields_are_formatted() {
        let comparison = compare_cities(&names(&["São Paulo"]), json!({}), "gym");
        let sp = &comparison.results[0];
        assert_eq!(sp.population, "12.3M");
        assert_eq!(sp.avg_income, "R$ 4,200");
        assert_eq!(sp.gdp_per_capita, "R$ 58,000");
        assert_eq!(sp.market_saturation, "65%");
        assert_eq!(sp.growth_rate, "1.8%");
        assert_eq!(
            sp.recommendation,
            "Excellent choice for gym. High potential, act quickly."
        );
        let value = serde_json::to_value(sp).unwrap();
        assert_eq!(value["competition_level"], "high");
    }

    #[test]
    fn score_is_monotonic_in_each_input() {
        let base = city_score(2.0, 3000, Competition::Medium, 2.0);
        assert!(city_score(3.0, 3000, Competition::Medium, 2.0) >= base);
        assert!(city_score(2.0, 3400, Competition::Medium, 2.0) >= base);
        assert!(city_score(2.0, 3000, Competition::Low, 2.0) >= base);
        assert!(city_score(2.0, 3000, Competition::Medium, 2.5) >= base);
        assert_eq!(city_score(50.0, 100_000, Competition::Low, 10.0), 100.0);
    }

    #[test]
    fn recommendation_thresholds() {
        assert!(recommendation(85.0, "x").starts_with("Excellent"));
        assert!(recommendation(70.0, "x").starts_with("Good"));
        assert!(recommendation(60.0, "x").starts_with("Moderate"));
        assert!(recommendation(59.9, "x").starts_with("Challenging"));
    }

    #[test]
    fn empty_comparison_has_placeholder_summary() {
        let comparison = compare_cities(&[], json!({"income": true}), "general");
        assert_eq!(comparison.summary, "No cities to compare");
        assert_eq!(comparison.criteria, json!({"income": true}));
    }
}
