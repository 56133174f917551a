use serde::{Deserialize, Serialize};

/// Factor scores as collected by the HR survey. All satisfaction-style
/// fields are on a 0-10 scale; `tenure` is in years.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionInput {
    pub job_satisfaction: f64,
    pub engagement_level: f64,
    pub tenure: f64,
    pub work_life_balance: f64,
    pub salary_satisfaction: f64,
    pub career_growth: f64,
    pub manager_relationship: f64,
    pub performance_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPrediction {
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub retention_probability: u32,
    pub recommendations: Vec<String>,
}

/// Rule-based risk summation. Each factor contributes a fixed number of
/// points at its thresholds; the total maps to a risk level and an inverse
/// retention probability.
pub fn predict(input: &RetentionInput) -> RetentionPrediction {
    let mut risk_score: u32 = 0;

    // Job satisfaction (lower = higher risk)
    risk_score += match input.job_satisfaction {
        s if s <= 3.0 => 30,
        s if s <= 6.0 => 15,
        s if s <= 8.0 => 5,
        _ => 0,
    };

    // Engagement level
    risk_score += match input.engagement_level {
        s if s <= 3.0 => 25,
        s if s <= 6.0 => 12,
        s if s <= 8.0 => 3,
        _ => 0,
    };

    // Tenure in years: both very new and very long-tenured carry risk
    risk_score += match input.tenure {
        t if t < 1.0 => 20,
        t if t < 2.0 => 10,
        t if t > 5.0 => 5,
        _ => 0,
    };

    risk_score += match input.work_life_balance {
        s if s <= 3.0 => 15,
        s if s <= 6.0 => 8,
        _ => 0,
    };

    risk_score += match input.salary_satisfaction {
        s if s <= 3.0 => 20,
        s if s <= 6.0 => 10,
        _ => 0,
    };

    risk_score += match input.career_growth {
        s if s <= 3.0 => 15,
        s if s <= 6.0 => 7,
        _ => 0,
    };

    risk_score += match input.manager_relationship {
        s if s <= 3.0 => 12,
        s if s <= 6.0 => 6,
        _ => 0,
    };

    if input.performance_score <= 3.0 {
        risk_score += 10;
    }

    let risk_level = if risk_score >= 60 {
        RiskLevel::High
    } else if risk_score >= 30 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let retention_probability = 100u32.saturating_sub(risk_score);

    RetentionPrediction {
        risk_level,
        risk_score,
        retention_probability,
        recommendations: recommendations(risk_level, input),
    }
}

fn recommendations(risk_level: RiskLevel, input: &RetentionInput) -> Vec<String> {
    let mut out = Vec::new();

    if input.job_satisfaction <= 5.0 {
        out.push("Schedule one-on-one meetings to discuss job satisfaction".to_string());
    }
    if input.career_growth <= 5.0 {
        out.push("Provide career development opportunities and training".to_string());
    }
    if input.work_life_balance <= 5.0 {
        out.push("Review workload and consider flexible working arrangements".to_string());
    }
    if input.salary_satisfaction <= 5.0 {
        out.push("Review compensation package and benefits".to_string());
    }
    if input.manager_relationship <= 5.0 {
        out.push("Manager training on employee engagement and communication".to_string());
    }
    if risk_level == RiskLevel::High {
        out.push("Immediate retention intervention required".to_string());
        out.push("Consider retention bonus or promotion opportunities".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn content_input() -> RetentionInput {
        RetentionInput {
            job_satisfaction: 9.0,
            engagement_level: 9.0,
            tenure: 3.0,
            work_life_balance: 9.0,
            salary_satisfaction: 9.0,
            career_growth: 9.0,
            manager_relationship: 9.0,
            performance_score: 9.0,
        }
    }

    #[test]
    fn satisfied_mid_tenure_employee_is_low_risk() {
        let prediction = predict(&content_input());
        assert_eq!(prediction.risk_score, 0);
        assert_eq!(prediction.risk_level, RiskLevel::Low);
        assert_eq!(prediction.retention_probability, 100);
        assert!(prediction.recommendations.is_empty());
    }

    #[test]
    fn dissatisfied_newcomer_is_high_risk() {
        let input = RetentionInput {
            job_satisfaction: 2.0,
            engagement_level: 2.0,
            tenure: 0.5,
            work_life_balance: 2.0,
            salary_satisfaction: 2.0,
            career_growth: 2.0,
            manager_relationship: 2.0,
            performance_score: 2.0,
        };
        let prediction = predict(&input);
        // 30 + 25 + 20 + 15 + 20 + 15 + 12 + 10
        assert_eq!(prediction.risk_score, 147);
        assert_eq!(prediction.risk_level, RiskLevel::High);
        assert_eq!(prediction.retention_probability, 0);
        assert!(prediction
            .recommendations
            .contains(&"Immediate retention intervention required".to_string()));
    }

    #[test]
    fn medium_band_starts_at_thirty_points() {
        let mut input = content_input();
        input.job_satisfaction = 5.0; // +15
        input.engagement_level = 5.0; // +12
        input.manager_relationship = 6.0; // +6
        let prediction = predict(&input);
        assert_eq!(prediction.risk_score, 33);
        assert_eq!(prediction.risk_level, RiskLevel::Medium);
        assert_eq!(prediction.retention_probability, 67);
    }

    #[test]
    fn long_tenure_adds_a_small_risk_bump() {
        let mut input = content_input();
        input.tenure = 8.0;
        assert_eq!(predict(&input).risk_score, 5);
    }
}
