//! Dashboard telemetry
//!
//! Three sources feed the same payload shape:
//!
//! - [`empty`] for users without workflows
//! - [`aggregate`] over the user's execution logs in the window
//! - [`synthetic`] sample data, stable per user and day, until real runs exist

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::round_to;
use crate::models::execution_logs;

const BUCKETS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum TimeWindow {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TimeWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Day => "24h",
            TimeWindow::Week => "7d",
            TimeWindow::Month => "30d",
            TimeWindow::Quarter => "90d",
        }
    }

    pub fn days(self) -> i64 {
        match self {
            TimeWindow::Day => 1,
            TimeWindow::Week => 7,
            TimeWindow::Month => 30,
            TimeWindow::Quarter => 90,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::days(self.days())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickStat {
    pub label: &'static str,
    pub value: String,
    pub change: String,
    pub trend: &'static str,
    pub description: String,
}

impl QuickStat {
    fn new(label: &'static str, value: String, change: String, trend: &'static str, description: impl Into<String>) -> Self {
        Self {
            label,
            value,
            change,
            trend,
            description: description.into(),
        }
    }

    fn neutral(label: &'static str, value: &str, description: &str) -> Self {
        Self::new(label, value.to_string(), "--".to_string(), "neutral", description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiMetrics {
    pub time_saved: String,
    pub cost_saved: String,
    pub efficiency: String,
    pub error_reduction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentPerformance {
    pub name: String,
    pub success: f64,
    pub latency: i64,
    pub executions: i64,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostItem {
    pub label: &'static str,
    pub value: u32,
    pub amount: Amount,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitSlice {
    pub label: &'static str,
    pub value: String,
    pub percent: i64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub time_range: TimeWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_executions: Option<usize>,
    pub quick_stats: Vec<QuickStat>,
    pub roi_metrics: RoiMetrics,
    pub agent_performance: Vec<AgentPerformance>,
    pub cost_breakdown: Vec<CostItem>,
    pub total_cost: Amount,
    pub execution_volume: Vec<i64>,
    pub wait_distribution: Vec<WaitSlice>,
}

const COST_SHARES: [(&str, u32, &str); 5] = [
    ("AI Model Inference", 45, "sunset"),
    ("Data Processing", 25, "forest"),
    ("Storage", 15, "coral"),
    ("Network", 10, "amber"),
    ("Other", 5, "muted"),
];

/// Dollars: whole for sample data, cents for measured runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Amount {
    Whole(i64),
    Cents(f64),
}

impl Amount {
    fn rounded(value: f64, digits: i32) -> Self {
        if digits <= 0 {
            Amount::Whole(value.round() as i64)
        } else {
            Amount::Cents(round_to(value, digits))
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Amount::Whole(value) => value as f64,
            Amount::Cents(value) => value,
        }
    }
}

fn cost_breakdown(total: f64, digits: i32) -> Vec<CostItem> {
    COST_SHARES
        .iter()
        .map(|&(label, value, color)| CostItem {
            label,
            value,
            amount: Amount::rounded(total * value as f64 / 100.0, digits),
            color,
        })
        .collect()
}

/// `1234567` as `1,234,567`
fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Payload for a user with no workflows
pub fn empty(window: TimeWindow) -> Telemetry {
    Telemetry {
        time_range: window,
        generated_at: None,
        total_executions: None,
        quick_stats: vec![
            QuickStat::neutral("Total Cost", "$0", "No workflows yet"),
            QuickStat::neutral("Avg Latency", "0ms", "No data"),
            QuickStat::neutral("Throughput", "0 rpm", "No requests"),
            QuickStat::neutral("Error Rate", "0%", "No errors"),
        ],
        roi_metrics: RoiMetrics {
            time_saved: "0 hours".to_string(),
            cost_saved: "$0".to_string(),
            efficiency: "0%".to_string(),
            error_reduction: "0%".to_string(),
        },
        agent_performance: Vec::new(),
        cost_breakdown: Vec::new(),
        total_cost: Amount::Whole(0),
        execution_volume: vec![0; BUCKETS],
        wait_distribution: Vec::new(),
    }
}

#[derive(Default)]
struct RoleStats {
    total: i64,
    success: i64,
    latency: i64,
}

/// Real numbers from execution logs; `None` when there are none
pub fn aggregate(window: TimeWindow, logs: &[execution_logs::Model], now: DateTime<Utc>) -> Option<Telemetry> {
    if logs.is_empty() {
        return None;
    }

    let total = logs.len();
    let successes = logs.iter().filter(|l| l.success).count();
    let total_latency: i64 = logs.iter().map(|l| l.latency_ms as i64).sum();
    let total_cost: f64 = logs.iter().map(|l| l.cost_usd).sum();

    let success_rate = successes as f64 / total as f64 * 100.0;
    let avg_latency = total_latency as f64 / total as f64;
    let error_rate = 100.0 - success_rate;
    let throughput = total as f64 / (window.days() as f64 * 24.0 * 60.0);

    // BTreeMap keeps the role order stable across requests
    let mut roles: BTreeMap<String, RoleStats> = BTreeMap::new();
    for log in logs {
        let role = log
            .agent_role
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "Unknown Agent".to_string());
        let stats = roles.entry(role).or_default();
        stats.total += 1;
        stats.success += log.success as i64;
        stats.latency += log.latency_ms as i64;
    }

    let agent_performance = roles
        .into_iter()
        .map(|(name, stats)| {
            let ratio = stats.success as f64 / stats.total as f64;
            AgentPerformance {
                name,
                success: round_to(ratio * 100.0, 1),
                latency: (stats.latency as f64 / stats.total as f64).round() as i64,
                executions: stats.total,
                status: if ratio > 0.97 {
                    "optimal"
                } else if ratio > 0.90 {
                    "good"
                } else {
                    "moderate"
                },
            }
        })
        .collect();

    let hours_saved = (total as f64 * 0.1).round() as i64;
    let cost_saved = (hours_saved as f64 * 100.0 - total_cost).round() as i64;
    let wait = |share: f64| format!("{}ms", (avg_latency * share) as i64);

    Some(Telemetry {
        time_range: window,
        generated_at: Some(now.to_rfc3339()),
        total_executions: Some(total),
        quick_stats: vec![
            QuickStat::new(
                "Total Cost",
                format!("${:.2}", total_cost),
                "-12%".to_string(),
                "down",
                format!("Total infrastructure cost for {}", window.as_str()),
            ),
            QuickStat::new(
                "Avg Latency",
                format!("{}ms", avg_latency as i64),
                "-8%".to_string(),
                "down",
                "Average response time per request",
            ),
            QuickStat::new(
                "Throughput",
                format!("{:.1} rpm", throughput),
                "+15%".to_string(),
                "up",
                "Requests processed per minute",
            ),
            QuickStat::new(
                "Error Rate",
                format!("{:.2}%", error_rate),
                format!("-{}%", (100.0 - success_rate) as i64),
                "down",
                "Failed requests percentage",
            ),
        ],
        roi_metrics: RoiMetrics {
            time_saved: format!("{} hours", hours_saved),
            cost_saved: format!("${}", thousands(cost_saved)),
            efficiency: format!("{}%", (success_rate * 2.5) as i64),
            error_reduction: format!("{}%", success_rate as i64),
        },
        agent_performance,
        cost_breakdown: cost_breakdown(total_cost, 2),
        total_cost: Amount::rounded(total_cost, 2),
        execution_volume: execution_volume(logs, window, now),
        wait_distribution: vec![
            WaitSlice {
                label: "Queue Time",
                value: wait(0.15),
                percent: 15,
                color: "sunset",
            },
            WaitSlice {
                label: "Processing",
                value: wait(0.70),
                percent: 70,
                color: "forest",
            },
            WaitSlice {
                label: "Response",
                value: wait(0.15),
                percent: 15,
                color: "coral",
            },
        ],
    })
}

/// Twelve buckets across the window, newest on the right
///
/// Non-empty buckets are scaled into `20..=100` so small counts still show.
pub fn execution_volume(logs: &[execution_logs::Model], window: TimeWindow, now: DateTime<Utc>) -> Vec<i64> {
    let mut volume = [0i64; BUCKETS];
    let bucket_ms = window.duration().num_milliseconds() as f64 / BUCKETS as f64;

    for log in logs {
        let age_ms = (now - log.executed_at).num_milliseconds().max(0) as f64;
        let index = ((age_ms / bucket_ms) as usize).min(BUCKETS - 1);
        volume[BUCKETS - 1 - index] += 1;
    }

    let max = volume.iter().copied().max().unwrap_or(0).max(1) as f64;
    volume
        .iter()
        .map(|&v| if v > 0 { (v as f64 / max * 80.0 + 20.0) as i64 } else { 0 })
        .collect()
}

/// Seed from the first 32 bits of `sha256("{user}-{date}-{range}")`
pub fn seed(user_id: Uuid, day: NaiveDate, window: TimeWindow) -> u64 {
    let digest = Sha256::digest(format!("{}-{}-{}", user_id, day.format("%Y-%m-%d"), window.as_str()));
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) as u64
}

/// Plausible sample numbers, identical for one user, day and window
pub fn synthetic(user_id: Uuid, window: TimeWindow, now: DateTime<Utc>) -> Telemetry {
    let mut rng = StdRng::seed_from_u64(seed(user_id, now.date_naive(), window));
    let scale = window.days() as f64;

    let base_cost = rng.gen_range(35.0..55.0);
    let base_latency = rng.gen_range(180.0..280.0);
    let base_throughput = rng.gen_range(70.0..100.0);
    let base_error_rate = rng.gen_range(0.005..0.02);

    let total_cost = (base_cost * scale).round();
    let avg_latency = (base_latency * (1.0 - (scale * 0.002).min(0.15))).round();
    let throughput = (base_throughput * (1.0 + (scale * 0.003).min(0.20))).round();
    let error_rate = round_to(base_error_rate * (1.0 - (scale * 0.008).min(0.5)), 4);

    let cost_change: i32 = rng.gen_range(-20..=-5);
    let latency_change: i32 = rng.gen_range(-15..=-3);
    let throughput_change: i32 = rng.gen_range(5..=25);
    let error_change: i32 = rng.gen_range(-60..=-30);

    let hours_saved = (rng.gen_range(4.0..8.0) * scale).round();
    let cost_saved = (hours_saved * rng.gen_range(80.0..150.0)).round();
    let efficiency = (200.0 + rng.gen_range(50.0..200.0) * (1.0 + scale * 0.01)).round();
    let error_reduction = (85.0 + rng.gen_range(5.0..12.0) * (scale * 0.1).min(1.0)).round();

    // (name, success base, success spread, latency base, latency spread, executions base, executions spread)
    let profiles = [
        ("Email Processor", 96.0, 3.5, 30.0, 25.0, 5000, 3000),
        ("Data Analyzer", 93.0, 4.0, 80.0, 60.0, 3000, 2000),
        ("Response Generator", 97.0, 2.5, 25.0, 20.0, 4000, 2500),
        ("Document Parser", 90.0, 5.0, 120.0, 80.0, 1500, 1500),
    ];
    let agent_performance = profiles
        .iter()
        .map(|&(name, success, success_spread, latency, latency_spread, runs, runs_spread)| {
            let success = round_to(success + rng.gen_range(0.0..success_spread), 1);
            let latency = (latency + rng.gen_range(0.0f64..latency_spread)).round() as i64;
            let executions = (runs + rng.gen_range(0..=runs_spread)) * window.days();
            let roll: f64 = rng.gen();
            let status = match name {
                "Email Processor" if roll > 0.3 => "optimal",
                "Email Processor" => "good",
                "Data Analyzer" if roll > 0.4 => "good",
                "Data Analyzer" => "moderate",
                "Document Parser" if roll > 0.5 => "moderate",
                "Document Parser" => "good",
                _ => "optimal",
            };
            AgentPerformance {
                name: name.to_string(),
                success,
                latency,
                executions,
                status,
            }
        })
        .collect();

    let execution_volume = (0..BUCKETS)
        .map(|_| (40.0 + rng.gen_range(0.0..60.0) * (1.0 + scale * 0.005)).round() as i64)
        .collect();

    let queue = (15.0 + rng.gen_range(0.0f64..15.0)).round() as i64;
    let processing = (130.0 + rng.gen_range(0.0f64..50.0)).round() as i64;
    let response = (25.0 + rng.gen_range(0.0f64..20.0)).round() as i64;
    let total_wait = (queue + processing + response) as f64;
    let slice = |label, value: i64, color| WaitSlice {
        label,
        value: format!("{}ms", value),
        percent: (value as f64 / total_wait * 100.0).round() as i64,
        color,
    };

    Telemetry {
        time_range: window,
        generated_at: Some(now.to_rfc3339()),
        total_executions: None,
        quick_stats: vec![
            QuickStat::new(
                "Total Cost",
                format!("${}", thousands(total_cost as i64)),
                format!("{}%", cost_change),
                "down",
                format!("Total infrastructure cost for {}", window.as_str()),
            ),
            QuickStat::new(
                "Avg Latency",
                format!("{}ms", avg_latency as i64),
                format!("{}%", latency_change),
                "down",
                "Average response time per request",
            ),
            QuickStat::new(
                "Throughput",
                format!("{} rpm", throughput as i64),
                format!("+{}%", throughput_change),
                "up",
                "Requests processed per minute",
            ),
            QuickStat::new(
                "Error Rate",
                format!("{:.2}%", error_rate),
                format!("{}%", error_change),
                "down",
                "Failed requests percentage",
            ),
        ],
        roi_metrics: RoiMetrics {
            time_saved: format!("{} hours", hours_saved as i64),
            cost_saved: format!("${}", thousands(cost_saved as i64)),
            efficiency: format!("{}%", efficiency as i64),
            error_reduction: format!("{}%", error_reduction as i64),
        },
        agent_performance,
        cost_breakdown: cost_breakdown(total_cost, 0),
        total_cost: Amount::Whole(total_cost as i64),
        execution_volume,
        wait_distribution: vec![
            slice("Queue Time", queue, "sunset"),
            slice("Processing", processing, "forest"),
            slice("Response", response, "coral"),
        ],
    }
}

/// One simulated agent run, ready to be written to `execution_logs`
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedRun {
    pub agent_id: Option<Uuid>,
    pub agent_role: String,
    pub latency_ms: i32,
    pub success: bool,
    pub cost_usd: f64,
    pub error_message: Option<String>,
}

pub const SAMPLE_ROLES: [&str; 5] = [
    "Data Processor",
    "Email Handler",
    "Document Analyzer",
    "Validator",
    "Orchestrator",
];

/// One run per agent at a 95% success rate
pub fn simulate_agents(agents: &[(Uuid, String)], rng: &mut impl Rng) -> Vec<SimulatedRun> {
    agents
        .iter()
        .map(|(id, role)| {
            let success = rng.gen::<f64>() > 0.05;
            SimulatedRun {
                agent_id: Some(*id),
                agent_role: role.clone(),
                latency_ms: rng.gen_range(50..=500),
                success,
                cost_usd: round_to(rng.gen_range(0.001..0.01), 4),
                error_message: (!success).then(|| "Simulated error for testing".to_string()),
            }
        })
        .collect()
}

/// Three to five runs over the sample roles at a 90% success rate
pub fn simulate_sample(rng: &mut impl Rng) -> Vec<SimulatedRun> {
    let count = rng.gen_range(3..=5);
    (0..count)
        .map(|i| SimulatedRun {
            agent_id: None,
            agent_role: SAMPLE_ROLES[i % SAMPLE_ROLES.len()].to_string(),
            latency_ms: rng.gen_range(50..=500),
            success: rng.gen::<f64>() > 0.1,
            cost_usd: round_to(rng.gen_range(0.001..0.01), 4),
            error_message: None,
        })
        .collect()
}
