//! Keyword heuristics over a workflow description
//!
//! [`analyze`] is pure apart from the timestamp: the same description and
//! step count always produce the same report.

use chrono::Utc;
use serde::Serialize;

use super::round_to;

const HIGH_COMPLEXITY: [&str; 7] = [
    "integrate",
    "synchronize",
    "parallel",
    "coordinate",
    "orchestrate",
    "complex",
    "multiple",
];
const MEDIUM_COMPLEXITY: [&str; 6] = ["process", "transform", "validate", "filter", "analyze", "calculate"];
const LOW_COMPLEXITY: [&str; 6] = ["send", "receive", "store", "retrieve", "display", "show"];

const BOTTLENECK_INDICATORS: [&str; 8] = [
    "manual", "approval", "review", "wait", "queue", "pending", "human", "verify",
];

const RISK_KEYWORDS: [&str; 7] = [
    "critical",
    "sensitive",
    "security",
    "compliance",
    "regulation",
    "legal",
    "financial",
];

const RED: &str = "#EF4444";
const ORANGE: &str = "#F59E0B";
const BLUE: &str = "#3B82F6";
const GREEN: &str = "#10B981";

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub complexity: Complexity,
    pub bottlenecks: Bottlenecks,
    pub optimizations: Vec<Optimization>,
    pub cost_benefit: CostBenefit,
    pub risks: Risks,
    pub overall_score: OverallScore,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Complexity {
    pub score: u32,
    pub level: &'static str,
    pub color: &'static str,
    pub factors: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bottleneck {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub indicator: String,
    pub severity: &'static str,
    pub description: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bottlenecks {
    pub count: usize,
    pub detected: Vec<Bottleneck>,
    pub has_bottlenecks: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Optimization {
    pub title: &'static str,
    pub description: String,
    pub impact: &'static str,
    pub effort: &'static str,
    pub time_savings: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostBenefit {
    pub manual_hours_per_execution: f64,
    pub automated_hours_per_execution: f64,
    pub time_saved_percentage: u32,
    pub monthly_time_savings_hours: f64,
    pub monthly_cost_savings: f64,
    pub annual_cost_savings: f64,
    pub roi_months: u32,
    pub productivity_boost: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Risk {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: String,
    pub severity: &'static str,
    pub mitigation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Risks {
    pub score: u32,
    pub level: &'static str,
    pub color: &'static str,
    pub identified_risks: Vec<Risk>,
    pub risk_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverallScore {
    pub score: i64,
    pub status: &'static str,
    pub color: &'static str,
    pub recommendation: &'static str,
}

/// Full report for a description and its steps
pub fn analyze(description: &str, steps: &[String]) -> Analysis {
    let text = description.to_lowercase();

    let complexity = complexity(&text, steps.len());
    let bottlenecks = bottlenecks(&text);
    let optimizations = optimizations(&text, steps.len(), &bottlenecks);
    let cost_benefit = cost_benefit(steps.len());
    let risks = risks(&text);
    let overall_score = overall_score(&complexity, &bottlenecks, &risks);

    Analysis {
        complexity,
        bottlenecks,
        optimizations,
        cost_benefit,
        risks,
        overall_score,
        analyzed_at: Utc::now().to_rfc3339(),
    }
}

fn matches(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(*kw)).count()
}

fn complexity(text: &str, step_count: usize) -> Complexity {
    let mut factors = Vec::new();

    let mut score = if step_count > 10 {
        factors.push("High step count (>10 steps)".to_string());
        3.0
    } else if step_count > 5 {
        factors.push("Medium step count (6-10 steps)".to_string());
        2.0
    } else {
        1.0
    };

    let high = matches(text, &HIGH_COMPLEXITY);
    if high > 0 {
        factors.push(format!("Contains {} high-complexity indicators", high));
    }
    score += high as f64 * 0.5;
    score += matches(text, &MEDIUM_COMPLEXITY) as f64 * 0.3;
    score += matches(text, &LOW_COMPLEXITY) as f64 * 0.1;

    let score = (score.trunc() as u32).clamp(1, 10);
    let (level, color) = match score {
        8.. => ("Very High", RED),
        6..=7 => ("High", ORANGE),
        4..=5 => ("Medium", BLUE),
        _ => ("Low", GREEN),
    };

    Complexity {
        score,
        level,
        color,
        factors,
        description: format!(
            "This workflow has {} complexity with a score of {}/10",
            level.to_lowercase(),
            score
        ),
    }
}

fn bottlenecks(text: &str) -> Bottlenecks {
    let mut detected: Vec<Bottleneck> = BOTTLENECK_INDICATORS
        .iter()
        .filter(|indicator| text.contains(*indicator))
        .map(|indicator| Bottleneck {
            kind: "Manual Intervention",
            indicator: indicator.to_string(),
            severity: "High",
            description: format!("Requires {} which may slow down the workflow", indicator),
            suggestion: format!("Consider automating the {} step", indicator),
        })
        .collect();

    let sequential = text.matches("then").count() + text.matches("after").count();
    if sequential > 3 {
        detected.push(Bottleneck {
            kind: "Sequential Dependencies",
            indicator: "Multiple sequential steps".to_string(),
            severity: "Medium",
            description: format!("Workflow has {} sequential dependencies", sequential),
            suggestion: "Look for opportunities to parallelize independent tasks".to_string(),
        });
    }

    Bottlenecks {
        count: detected.len(),
        has_bottlenecks: !detected.is_empty(),
        detected,
    }
}

fn optimizations(text: &str, step_count: usize, bottlenecks: &Bottlenecks) -> Vec<Optimization> {
    let mut suggestions = Vec::new();

    if bottlenecks.count > 0 {
        suggestions.push(Optimization {
            title: "Automate Manual Steps",
            description: format!(
                "Found {} manual intervention points that could be automated",
                bottlenecks.count
            ),
            impact: "High",
            effort: "Medium",
            time_savings: format!("{}% reduction in processing time", bottlenecks.count * 15),
        });
    }

    if step_count > 3 {
        suggestions.push(Optimization {
            title: "Parallelize Independent Tasks",
            description: "Some workflow steps may be able to run in parallel".to_string(),
            impact: "Medium",
            effort: "Low",
            time_savings: "20-30% faster execution".to_string(),
        });
    }

    if text.contains("data") || text.contains("information") {
        suggestions.push(Optimization {
            title: "Implement Data Caching",
            description: "Cache frequently accessed data to reduce processing time".to_string(),
            impact: "Medium",
            effort: "Low",
            time_savings: "15% reduction in data retrieval time".to_string(),
        });
    }

    suggestions.push(Optimization {
        title: "Add Robust Error Handling",
        description: "Implement retry logic and fallback mechanisms".to_string(),
        impact: "High",
        effort: "Medium",
        time_savings: "Prevent workflow failures and reduce manual intervention".to_string(),
    });

    suggestions
}

/// Half an hour per manual step, 20 runs a month, 70% automated, $50/h
fn cost_benefit(step_count: usize) -> CostBenefit {
    let manual_hours = step_count as f64 * 0.5;
    let monthly_hours = manual_hours * 0.7 * 20.0;
    let monthly_savings = monthly_hours * 50.0;

    CostBenefit {
        manual_hours_per_execution: round_to(manual_hours, 1),
        automated_hours_per_execution: round_to(manual_hours * 0.3, 1),
        time_saved_percentage: 70,
        monthly_time_savings_hours: round_to(monthly_hours, 1),
        monthly_cost_savings: round_to(monthly_savings, 2),
        annual_cost_savings: round_to(monthly_savings * 12.0, 2),
        roi_months: 3,
        productivity_boost: "3x faster execution",
    }
}

fn risks(text: &str) -> Risks {
    let mut identified: Vec<Risk> = RISK_KEYWORDS
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .map(|keyword| Risk {
            kind: "Compliance/Security",
            description: format!("Workflow involves {} operations", keyword),
            severity: "High",
            mitigation: format!("Ensure proper {} protocols are in place", keyword),
        })
        .collect();
    let mut score = identified.len() as u32 * 2;

    if text.contains("data") || text.contains("database") {
        identified.push(Risk {
            kind: "Data Integrity",
            description: "Workflow processes data".to_string(),
            severity: "Medium",
            mitigation: "Implement data validation and backup procedures".to_string(),
        });
        score += 1;
    }

    if text.contains("integrate") || text.contains("api") {
        identified.push(Risk {
            kind: "Integration Failure",
            description: "Workflow depends on external systems".to_string(),
            severity: "Medium",
            mitigation: "Add retry logic and failover mechanisms".to_string(),
        });
        score += 1;
    }

    let (level, color) = match score {
        5.. => ("High", RED),
        3..=4 => ("Medium", ORANGE),
        _ => ("Low", GREEN),
    };

    Risks {
        score: score.min(10),
        level,
        color,
        risk_count: identified.len(),
        identified_risks: identified,
    }
}

fn overall_score(complexity: &Complexity, bottlenecks: &Bottlenecks, risks: &Risks) -> OverallScore {
    let weighted = (10.0 - complexity.score as f64) * 0.3
        + (10.0 - bottlenecks.count as f64) * 0.4
        + (10.0 - risks.score as f64) * 0.3;
    let score = (weighted / 10.0 * 100.0).trunc() as i64;

    let (status, color, recommendation) = match score {
        80.. => (
            "Excellent",
            GREEN,
            "Workflow is well-designed and ready for automation",
        ),
        60..=79 => (
            "Good",
            BLUE,
            "Workflow is solid with minor optimization opportunities",
        ),
        40..=59 => (
            "Fair",
            ORANGE,
            "Workflow needs optimization before full automation",
        ),
        _ => (
            "Needs Improvement",
            RED,
            "Significant optimization required for successful automation",
        ),
    };

    OverallScore {
        score,
        status,
        color,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kit::expect;

    fn steps(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("step {}", i)).collect()
    }

    #[test]
    fn test_simple_workflow_scores_low_complexity() {
        let report = analyze("Send a weekly summary email", &steps(2));

        expect!(report.complexity.score).to_equal(1);
        expect!(report.complexity.level).to_equal("Low");
        expect!(report.complexity.description.clone())
            .to_equal("This workflow has low complexity with a score of 1/10".to_string());
        expect!(report.bottlenecks.has_bottlenecks).to_be_false();
        expect!(report.optimizations.len()).to_equal(1);
        expect!(report.optimizations[0].title).to_equal("Add Robust Error Handling");
    }

    #[test]
    fn test_complexity_counts_keywords_and_steps() {
        // 3 (steps) + 4 high * 0.5 + 2 medium * 0.3 = 5.6 -> 5
        let report = analyze(
            "Integrate and synchronize multiple complex systems, then validate and transform",
            &steps(11),
        );

        expect!(report.complexity.score).to_equal(5);
        expect!(report.complexity.level).to_equal("Medium");
        expect!(report.complexity.factors.clone()).to_contain(&"High step count (>10 steps)".to_string());
        expect!(report.complexity.factors.clone())
            .to_contain(&"Contains 4 high-complexity indicators".to_string());
    }

    #[test]
    fn test_bottlenecks_and_sequential_dependencies() {
        let report = analyze(
            "Manual review, then approval, then export, then notify, after that archive",
            &[],
        );

        let kinds: Vec<&str> = report.bottlenecks.detected.iter().map(|b| b.kind).collect();
        expect!(kinds.clone()).to_contain(&"Manual Intervention");
        expect!(kinds).to_contain(&"Sequential Dependencies");
        // manual, approval, review + sequential
        expect!(report.bottlenecks.count).to_equal(4);
        expect!(report.optimizations[0].time_savings.clone())
            .to_equal("60% reduction in processing time".to_string());
    }

    #[test]
    fn test_risks_are_capped_and_leveled() {
        let report = analyze(
            "critical sensitive security compliance regulation legal financial data via api",
            &[],
        );

        expect!(report.risks.score).to_equal(10);
        expect!(report.risks.level).to_equal("High");
        expect!(report.risks.risk_count).to_equal(9);
    }

    #[test]
    fn test_cost_benefit_figures() {
        let report = analyze("anything", &steps(4));
        let cb = report.cost_benefit;

        expect!(cb.manual_hours_per_execution).to_equal(2.0);
        expect!(cb.automated_hours_per_execution).to_equal(0.6);
        expect!(cb.monthly_time_savings_hours).to_equal(28.0);
        expect!(cb.monthly_cost_savings).to_equal(1400.0);
        expect!(cb.annual_cost_savings).to_equal(16800.0);
    }

    #[test]
    fn test_overall_score_for_clean_workflow() {
        // complexity 1, no bottlenecks, no risks: (9*0.3 + 10*0.4 + 10*0.3) * 10, truncated
        let report = analyze("send a report", &[]);
        expect!(report.overall_score.score).to_be_between(96, 97);
        expect!(report.overall_score.status).to_equal("Excellent");

        let report = analyze(
            "manual review and approval of critical financial data, integrate with the legal api",
            &[],
        );
        expect!(report.overall_score.status).to_not_equal("Excellent");
    }

    #[test]
    fn test_serialized_shape_uses_original_keys() {
        let value = serde_json::to_value(analyze("manual data entry", &[])).unwrap();
        assert_eq!(value["bottlenecks"]["hasBottlenecks"], true);
        assert_eq!(value["bottlenecks"]["detected"][0]["type"], "Manual Intervention");
        assert_eq!(value["risks"]["identified_risks"][0]["type"], "Data Integrity");
    }
}
