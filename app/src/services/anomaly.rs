//! Z-score and rule-based anomaly checks against fixed baselines

use chrono::Utc;
use serde::Serialize;

use super::round_to;

const TIME_MEAN: f64 = 3.5;
const TIME_STD: f64 = 1.2;
const AGENT_MEAN: f64 = 2.5;
const AGENT_STD: f64 = 0.8;
const SUCCESS_BASELINE: f64 = 0.92;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Severity::Critical
        } else if score > 0.4 {
            Severity::High
        } else if score > 0.2 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Observation {
    pub completion_time: f64,
    pub agent_count: u32,
    pub success_rate: f64,
    pub error_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub severity: Severity,
    pub details: String,
    pub baseline: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnomalyReport {
    pub is_anomaly: bool,
    pub anomaly_score: f64,
    pub severity: Severity,
    pub anomalies_detected: Vec<Finding>,
    pub recommendation: Option<&'static str>,
    pub timestamp: String,
}

pub fn detect(observation: &Observation) -> AnomalyReport {
    let mut findings = Vec::new();
    let mut scores = Vec::new();

    let time_z = ((observation.completion_time - TIME_MEAN) / TIME_STD).abs();
    if time_z > 2.0 {
        findings.push(Finding {
            kind: "Abnormal Completion Time",
            severity: if time_z > 3.0 { Severity::High } else { Severity::Medium },
            details: format!(
                "Completion time {}h is {:.1}σ from baseline",
                observation.completion_time, time_z
            ),
            baseline: TIME_MEAN,
        });
        scores.push((time_z / 3.0).min(1.0));
    }

    let agent_z = ((observation.agent_count as f64 - AGENT_MEAN) / AGENT_STD).abs();
    if agent_z > 2.0 {
        findings.push(Finding {
            kind: "Unusual Agent Count",
            severity: Severity::Low,
            details: format!(
                "Agent count {} deviates from typical {:.1}",
                observation.agent_count, AGENT_MEAN
            ),
            baseline: AGENT_MEAN,
        });
        scores.push((agent_z / 4.0).min(0.5));
    }

    if observation.success_rate < 0.7 {
        findings.push(Finding {
            kind: "Low Success Rate",
            severity: if observation.success_rate < 0.5 {
                Severity::Critical
            } else {
                Severity::High
            },
            details: format!(
                "Success rate {:.1}% is critically low",
                observation.success_rate * 100.0
            ),
            baseline: SUCCESS_BASELINE,
        });
        scores.push(1.0 - observation.success_rate);
    }

    if observation.error_count > 5 {
        findings.push(Finding {
            kind: "High Error Count",
            severity: if observation.error_count > 10 {
                Severity::Critical
            } else {
                Severity::High
            },
            details: format!("{} errors detected", observation.error_count),
            baseline: 0.0,
        });
        scores.push((observation.error_count as f64 / 15.0).min(1.0));
    }

    let score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    // A single critical finding outranks a diluted mean
    let worst = findings.iter().map(|f| f.severity).max();
    let severity = worst.map_or(Severity::from_score(score), |w| w.max(Severity::from_score(score)));

    AnomalyReport {
        is_anomaly: !findings.is_empty(),
        anomaly_score: round_to(score, 3),
        severity,
        recommendation: recommend(&findings),
        anomalies_detected: findings,
        timestamp: Utc::now().to_rfc3339(),
    }
}

fn recommend(findings: &[Finding]) -> Option<&'static str> {
    if findings.is_empty() {
        return None;
    }
    let serious = findings
        .iter()
        .filter(|f| f.severity >= Severity::High)
        .count();

    Some(match serious {
        0 => "Monitor workflow for recurring patterns.",
        1 => "Review workflow configuration and agent performance.",
        _ => "Immediate investigation required. Multiple critical issues detected.",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kit::expect;

    fn normal() -> Observation {
        Observation {
            completion_time: 3.5,
            agent_count: 2,
            success_rate: 1.0,
            error_count: 0,
        }
    }

    #[test]
    fn test_normal_run_is_quiet() {
        let report = detect(&normal());
        expect!(report.is_anomaly).to_be_false();
        expect!(report.anomaly_score).to_equal(0.0);
        expect!(report.severity).to_equal(Severity::Low);
        expect!(report.recommendation).to_be_none();
    }

    #[test]
    fn test_low_success_rate_always_flags() {
        let report = detect(&Observation {
            success_rate: 0.65,
            ..normal()
        });
        expect!(report.is_anomaly).to_be_true();
        expect!(report.severity).to_equal(Severity::High);
        expect!(report.anomalies_detected[0].details.clone()).to_equal("Success rate 65.0% is critically low".to_string());

        // The mean alone would only reach High here
        let report = detect(&Observation {
            completion_time: 8.5,
            agent_count: 8,
            success_rate: 0.45,
            ..normal()
        });
        expect!(report.severity).to_equal(Severity::Critical);
    }

    #[test]
    fn test_time_and_error_findings() {
        let report = detect(&Observation {
            completion_time: 8.3,
            error_count: 12,
            ..normal()
        });

        let kinds: Vec<&str> = report.anomalies_detected.iter().map(|f| f.kind).collect();
        expect!(kinds).to_equal(vec!["Abnormal Completion Time", "High Error Count"]);
        // z = 4.0 -> 1.0, errors 12/15 = 0.8
        expect!(report.anomaly_score).to_equal(0.9);
        expect!(report.anomalies_detected[0].details.clone()).to_equal("Completion time 8.3h is 4.0σ from baseline".to_string());
        expect!(report.recommendation).to_equal(Some(
            "Immediate investigation required. Multiple critical issues detected.",
        ));
    }

    #[test]
    fn test_agent_count_alone_is_low() {
        let report = detect(&Observation {
            agent_count: 5,
            ..normal()
        });
        expect!(report.anomalies_detected[0].severity).to_equal(Severity::Low);
        expect!(report.recommendation).to_equal(Some("Monitor workflow for recurring patterns."));
    }
}
