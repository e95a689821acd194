use std::fmt;

use serde::{Deserialize, Serialize};

pub const CAREER_COUNT: usize = 3;
pub const MIN_SKILLS: usize = 5;
pub const MAX_SKILLS: usize = 8;

/// How well a suggested career matches the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relevance {
    High,
    Medium,
    Low,
}

impl Relevance {
    pub const ALL: [Relevance; 3] = [Relevance::High, Relevance::Medium, Relevance::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Relevance::High => "High",
            Relevance::Medium => "Medium",
            Relevance::Low => "Low",
        }
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Career {
    pub title: String,
    pub description: String,
    pub relevance: Relevance,
}

/// Response-scoped recommendations, exactly as the model produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub careers: Vec<Career>,
    pub skills: Vec<String>,
    pub advice: String,
}

impl Recommendations {
    /// Deviations from the count contract the tool schema asks for.
    /// Empty when the object is fully conformant.
    pub fn conformance_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.careers.len() != CAREER_COUNT {
            issues.push(format!(
                "expected {CAREER_COUNT} careers, got {}",
                self.careers.len()
            ));
        }
        if !(MIN_SKILLS..=MAX_SKILLS).contains(&self.skills.len()) {
            issues.push(format!(
                "expected {MIN_SKILLS}-{MAX_SKILLS} skills, got {}",
                self.skills.len()
            ));
        }
        if self.advice.trim().is_empty() {
            issues.push("advice is empty".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Recommendations {
        serde_json::from_value(json!({
            "careers": [
                {"title": "Data Scientist", "description": "Fits your goal.", "relevance": "High"},
                {"title": "ML Engineer", "description": "Builds on your backend work.", "relevance": "Medium"},
                {"title": "Data Analyst", "description": "A stepping stone.", "relevance": "Low"}
            ],
            "skills": ["Python", "SQL", "Statistics", "Pandas", "Machine Learning"],
            "advice": "Start with statistics and build small projects."
        }))
        .unwrap()
    }

    #[test]
    fn test_relevance_wire_strings() {
        for r in Relevance::ALL {
            assert_eq!(serde_json::to_value(r).unwrap(), json!(r.as_str()));
        }
        assert!(serde_json::from_value::<Relevance>(json!("high")).is_err());
    }

    #[test]
    fn test_conformant_sample_has_no_issues() {
        assert!(sample().conformance_issues().is_empty());
    }

    #[test]
    fn test_wrong_counts_reported() {
        let mut r = sample();
        r.careers.pop();
        r.skills.truncate(2);
        r.advice = " ".to_string();
        let issues = r.conformance_issues();
        assert_eq!(issues.len(), 3);
        assert!(issues[0].contains("got 2"));
    }

    #[test]
    fn test_eight_skills_allowed_nine_not() {
        let mut r = sample();
        r.skills = (0..8).map(|i| format!("skill {i}")).collect();
        assert!(r.conformance_issues().is_empty());
        r.skills.push("one too many".to_string());
        assert_eq!(r.conformance_issues().len(), 1);
    }
}
