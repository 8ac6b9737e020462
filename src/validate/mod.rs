//! Best-practice validation for discovery answers
//!
//! Validators are advisory: they produce findings ranked by severity but
//! never block an answer from being recorded. Each validator targets one
//! specific high-stakes question (IP ranges, environment isolation, DR,
//! connectivity, budget, security baseline); questions without a registered
//! validator simply produce no findings.

use std::net::Ipv4Addr;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Severity of a single validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Meets best practices
    Success,
    /// Recommendation
    Info,
    /// Should be addressed before deployment
    Warning,
    /// Fails a structural check
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single advisory finding produced by a validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    pub recommendation: Option<String>,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            recommendation: None,
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// Validator function signature: answer text in, ordered findings out
pub type ValidatorFn = fn(&str) -> Vec<Finding>;

/// Resolve the validator for a question id, if one is registered.
///
/// The mapping is closed: it is consulted once when the catalog is built,
/// so an unregistered id is an explicit "no findings" state rather than a
/// runtime lookup miss.
pub fn validator_for(question_id: &str) -> Option<ValidatorFn> {
    match question_id {
        "net_001" => Some(validate_ip_range),
        "gov_003" => Some(validate_environment_separation),
        "dr_001" => Some(validate_backup_strategy),
        "net_003" => Some(validate_connectivity_method),
        "cost_001" => Some(validate_budget),
        "sec_001" => Some(validate_security_baseline),
        _ => None,
    }
}

/// Validate a CIDR range destined for a virtual network.
pub fn validate_ip_range(answer: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let trimmed = answer.trim();

    let (addr_part, prefix) = match parse_cidr(trimmed) {
        Some(parsed) => parsed,
        None => {
            findings.push(
                Finding::new(
                    Severity::Error,
                    format!("Invalid IP range format: {trimmed}"),
                )
                .with_recommendation("Use CIDR notation (e.g., 10.0.0.0/16)"),
            );
            return findings;
        }
    };

    if !is_private_ipv4(addr_part) {
        findings.push(
            Finding::new(
                Severity::Error,
                format!("IP range {trimmed} is not in private address space"),
            )
            .with_recommendation(
                "Use private IP ranges: 10.0.0.0/8, 172.16.0.0/12, or 192.168.0.0/16",
            ),
        );
    }

    if prefix > 29 {
        let usable = (1u64 << (32 - prefix)).saturating_sub(5);
        findings.push(
            Finding::new(
                Severity::Warning,
                format!("Subnet /{prefix} is very small (max {usable} usable IPs)"),
            )
            .with_recommendation("Consider using /24 or larger for production workloads"),
        );
    } else if prefix < 16 {
        findings.push(
            Finding::new(
                Severity::Warning,
                format!("Network /{prefix} is very large"),
            )
            .with_recommendation(
                "Consider segmenting into smaller networks for better security and management",
            ),
        );
    }

    if (16..=24).contains(&prefix) {
        findings.push(Finding::new(
            Severity::Success,
            format!("IP range {trimmed} follows sizing best practices"),
        ));
    }

    findings
}

fn parse_cidr(input: &str) -> Option<(Ipv4Addr, u8)> {
    let (addr, prefix) = match input.split_once('/') {
        Some((addr, prefix)) => (addr, prefix.parse::<u8>().ok()?),
        // Bare address is treated as a host route
        None => (input, 32),
    };
    if prefix > 32 {
        return None;
    }
    Some((Ipv4Addr::from_str(addr).ok()?, prefix))
}

fn is_private_ipv4(addr: Ipv4Addr) -> bool {
    let octets = addr.octets();
    octets[0] == 10
        || (octets[0] == 172 && (16..=31).contains(&octets[1]))
        || (octets[0] == 192 && octets[1] == 168)
}

/// Validate the environment separation strategy.
pub fn validate_environment_separation(answer: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let lower = answer.to_lowercase();

    if lower.contains("subscription") && lower.contains("separate") {
        findings.push(
            Finding::new(
                Severity::Success,
                "Subscription-level isolation follows best practices",
            )
            .with_recommendation("This provides the strongest security boundary and governance"),
        );
    } else if lower.contains("resource group") {
        findings.push(
            Finding::new(
                Severity::Info,
                "Resource group isolation is acceptable for small deployments",
            )
            .with_recommendation("Consider subscription-level isolation for production workloads"),
        );
    } else if lower.contains("single") || lower.contains("same") {
        findings.push(
            Finding::new(
                Severity::Warning,
                "Single environment approach increases risk",
            )
            .with_recommendation(
                "Strongly recommend separating dev, test, and production environments",
            ),
        );
    }

    findings
}

/// Validate backup and disaster recovery objectives.
pub fn validate_backup_strategy(answer: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let lower = answer.to_lowercase();

    let has_rpo = lower.contains("rpo") || lower.contains("recovery point");
    let has_rto = lower.contains("rto") || lower.contains("recovery time");

    if has_rpo && has_rto {
        findings.push(
            Finding::new(Severity::Success, "RPO and RTO objectives defined")
                .with_recommendation("Ensure backup solutions meet these requirements"),
        );
    } else {
        let mut missing = Vec::new();
        if !has_rpo {
            missing.push("RPO (Recovery Point Objective)");
        }
        if !has_rto {
            missing.push("RTO (Recovery Time Objective)");
        }
        findings.push(
            Finding::new(
                Severity::Warning,
                format!("Missing critical DR metrics: {}", missing.join(", ")),
            )
            .with_recommendation("Define RPO and RTO to determine appropriate backup strategy"),
        );
    }

    if lower.contains("geo") || lower.contains("region") {
        findings.push(Finding::new(
            Severity::Success,
            "Geo-redundancy mentioned for disaster recovery",
        ));
    } else {
        findings.push(
            Finding::new(Severity::Info, "Consider geo-redundancy for critical workloads")
                .with_recommendation("Backup and replication services support cross-region copies"),
        );
    }

    findings
}

/// Validate the hybrid connectivity choice.
pub fn validate_connectivity_method(answer: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let lower = answer.to_lowercase();

    let has_expressroute = lower.contains("expressroute") || lower.contains("express route");
    let has_vpn = lower.contains("vpn");

    if has_expressroute {
        findings.push(
            Finding::new(
                Severity::Success,
                "ExpressRoute provides dedicated, low-latency connectivity",
            )
            .with_recommendation(
                "Recommended for production workloads with high throughput needs",
            ),
        );
    } else if has_vpn {
        findings.push(
            Finding::new(
                Severity::Info,
                "VPN is cost-effective but has bandwidth/latency limitations",
            )
            .with_recommendation(
                "Consider ExpressRoute for production workloads or high data transfer",
            ),
        );
    }

    if has_expressroute && has_vpn {
        findings.push(
            Finding::new(
                Severity::Success,
                "Dual connectivity (ExpressRoute + VPN) provides redundancy",
            )
            .with_recommendation("This is the best practice for mission-critical workloads"),
        );
    }

    findings
}

/// Validate the budget answer for an actual amount and cost controls.
pub fn validate_budget(answer: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let lower = answer.to_lowercase();

    let has_amount = Regex::new(r"\$[\d,]+|\d+\s*(k|thousand|m|million)")
        .map(|re| re.is_match(&lower))
        .unwrap_or(false);

    if has_amount {
        findings.push(Finding::new(Severity::Success, "Budget amount specified"));
    } else {
        findings.push(
            Finding::new(Severity::Warning, "No specific budget amount mentioned")
                .with_recommendation("Define a clear budget to enable cost controls and alerts"),
        );
    }

    if lower.contains("monitor") || lower.contains("alert") {
        findings.push(
            Finding::new(Severity::Success, "Cost monitoring mentioned")
                .with_recommendation("Cost management tooling provides budgets, alerts, and recommendations"),
        );
    }

    findings
}

/// Validate security requirements for compliance frameworks and MFA.
pub fn validate_security_baseline(answer: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let lower = answer.to_lowercase();

    const FRAMEWORKS: [(&str, &str); 6] = [
        ("pci", "PCI-DSS"),
        ("hipaa", "HIPAA"),
        ("soc", "SOC 2"),
        ("iso", "ISO 27001"),
        ("gdpr", "GDPR"),
        ("fedramp", "FedRAMP"),
    ];

    let found: Vec<&str> = FRAMEWORKS
        .iter()
        .filter(|(key, _)| lower.contains(key))
        .map(|(_, name)| *name)
        .collect();

    if !found.is_empty() {
        findings.push(
            Finding::new(
                Severity::Success,
                format!("Compliance frameworks identified: {}", found.join(", ")),
            )
            .with_recommendation("Ensure the landing zone meets these compliance requirements"),
        );
    }

    if lower.contains("mfa") || lower.contains("multi-factor") {
        findings.push(Finding::new(
            Severity::Success,
            "MFA requirement mentioned - critical for security",
        ));
    } else {
        findings.push(
            Finding::new(Severity::Warning, "MFA not mentioned in security requirements")
                .with_recommendation("Strongly recommend enforcing MFA for all user access"),
        );
    }

    findings
}
