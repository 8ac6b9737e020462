//! Built-in landing zone discovery framework
//!
//! The full question set covering business context, network design,
//! security, governance, compliance, operations, workloads, cost,
//! integration, and disaster recovery.

use super::{Category, Priority, Question};

pub fn builtin_questions() -> Vec<Question> {
    use Category::*;
    use Priority::*;

    vec![
        // Business context
        Question::new(
            "biz_001",
            BusinessContext,
            Critical,
            "What is the primary business objective for moving to the cloud?",
        )
        .with_help("Understanding business drivers helps align technical decisions")
        .with_examples([
            "Digital transformation initiative",
            "Cost optimization and datacenter exit",
            "Support new products/services",
            "Improve agility and time-to-market",
        ]),
        Question::new(
            "biz_002",
            BusinessContext,
            Critical,
            "What is the expected timeline for the cloud deployment?",
        )
        .with_help("Timeline impacts design choices and migration strategy")
        .with_examples(["3 months", "6 months", "12 months", "18+ months"]),
        Question::new(
            "biz_003",
            BusinessContext,
            High,
            "What are the critical workloads to migrate first?",
        )
        .with_help("Identifies pilot workloads and initial design requirements"),
        Question::new(
            "biz_004",
            BusinessContext,
            Medium,
            "What is the organization's cloud maturity level?",
        )
        .with_examples([
            "No cloud experience",
            "Some cloud pilots",
            "Cloud-first strategy",
            "Multi-cloud expertise",
        ]),
        // Network design
        Question::new(
            "net_001",
            NetworkDesign,
            Critical,
            "What IP address ranges are available for cloud virtual networks?",
        )
        .with_help("Must not conflict with on-premises or other cloud networks")
        .with_examples(["10.100.0.0/16", "172.16.0.0/12", "192.168.0.0/16"])
        .with_pattern(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}/\d{1,2}$"),
        Question::new(
            "net_002",
            NetworkDesign,
            Critical,
            "What on-premises networks need connectivity to the cloud?",
        )
        .with_help("Determines dedicated-circuit or VPN requirements"),
        Question::new(
            "net_003",
            NetworkDesign,
            Critical,
            "Preferred connectivity method: ExpressRoute, Site-to-Site VPN, or both?",
        )
        .with_examples([
            "ExpressRoute (dedicated, low-latency)",
            "S2S VPN (cost-effective)",
            "Hybrid (both for redundancy)",
        ]),
        Question::new(
            "net_004",
            NetworkDesign,
            High,
            "What is the required dedicated-circuit bandwidth?",
        )
        .with_examples(["50 Mbps", "100 Mbps", "500 Mbps", "1 Gbps", "10 Gbps"])
        .with_related(["net_003"]),
        Question::new(
            "net_005",
            NetworkDesign,
            High,
            "What is the hub-spoke topology design? (Number of spokes, segmentation strategy)",
        )
        .with_help("Hub-spoke is the recommended landing zone pattern"),
        Question::new(
            "net_006",
            NetworkDesign,
            High,
            "What are the DNS server IPs (on-premises and cloud)?",
        )
        .with_examples(["On-prem: 10.50.10.5, 10.50.10.6", "Cloud resolver default"]),
        Question::new(
            "net_007",
            NetworkDesign,
            Medium,
            "Are private endpoints required for managed PaaS services?",
        )
        .with_examples([
            "Yes, for all PaaS",
            "Only for critical services",
            "No, use service endpoints",
        ]),
        // Security & identity
        Question::new(
            "sec_001",
            SecurityIdentity,
            Critical,
            "Is Multi-Factor Authentication (MFA) required for all users?",
        )
        .with_examples(["Yes, all users", "Admins only", "Conditional access based"]),
        Question::new(
            "sec_002",
            SecurityIdentity,
            Critical,
            "What is the identity provider? (cloud-native, hybrid, federated)",
        )
        .with_examples([
            "Cloud-native directory",
            "Hybrid with directory sync",
            "Federated (ADFS, PingFederate)",
        ]),
        Question::new(
            "sec_003",
            SecurityIdentity,
            Critical,
            "What encryption requirements exist? (at-rest, in-transit, CMK)",
        )
        .with_help("Customer-managed keys (CMK) vs platform-managed keys"),
        Question::new(
            "sec_004",
            SecurityIdentity,
            High,
            "Is privileged identity management required?",
        )
        .with_examples(["Yes, for all admins", "Yes, for production only", "No"]),
        Question::new(
            "sec_005",
            SecurityIdentity,
            High,
            "What are the firewall requirements? (managed firewall, NVA, both)",
        )
        .with_examples([
            "Managed cloud firewall",
            "Third-party NVA (Palo Alto, Fortinet)",
            "Hybrid approach",
        ]),
        Question::new(
            "sec_006",
            SecurityIdentity,
            Medium,
            "Is enhanced DDoS protection required?",
        )
        .with_examples(["Yes, for internet-facing apps", "No, basic tier sufficient"]),
        Question::new(
            "sec_007",
            SecurityIdentity,
            Medium,
            "What SIEM solution will be used?",
        )
        .with_examples(["Cloud-native SIEM", "Splunk", "QRadar", "Existing on-prem SIEM"]),
        // Governance
        Question::new(
            "gov_001",
            Governance,
            Critical,
            "What is the subscription strategy? (per workload, per environment, per business unit)",
        )
        .with_help("Subscription design impacts billing, limits, and isolation"),
        Question::new(
            "gov_002",
            Governance,
            High,
            "What management group hierarchy is required?",
        )
        .with_examples([
            "Root > Platform > Landing Zones",
            "By geography",
            "By business unit",
        ]),
        Question::new(
            "gov_003",
            Governance,
            High,
            "What mandatory tags must be enforced on all resources?",
        )
        .with_examples([
            "CostCenter, Owner, Environment, Application",
            "ProjectCode, Compliance, DataClassification",
        ]),
        Question::new(
            "gov_004",
            Governance,
            High,
            "What naming conventions will be used for cloud resources?",
        )
        .with_help("Consistent naming aids management and automation")
        .with_examples(["<resource-type>-<workload>-<env>-<region>-<instance>"]),
        Question::new(
            "gov_005",
            Governance,
            Critical,
            "Which cloud regions are approved for deployment?",
        )
        .with_examples([
            "East US, West US",
            "West Europe, North Europe",
            "Southeast Asia, East Asia",
        ]),
        Question::new(
            "gov_006",
            Governance,
            Medium,
            "What resource types are prohibited? (VM sizes, services)",
        )
        .with_examples([
            "No burstable VM series",
            "No basic tier services",
            "No public IPs on VMs",
        ]),
        // Compliance
        Question::new(
            "comp_001",
            Compliance,
            Critical,
            "What regulatory compliance requirements apply? (HIPAA, PCI-DSS, SOC2, ISO)",
        )
        .with_help("Determines required controls and certifications"),
        Question::new(
            "comp_002",
            Compliance,
            Critical,
            "What is the data sovereignty requirement? (data residency, cross-border restrictions)",
        )
        .with_examples(["Data must stay in US", "EU GDPR compliance", "No restrictions"]),
        Question::new(
            "comp_003",
            Compliance,
            High,
            "What is the required audit log retention period?",
        )
        .with_examples(["90 days", "1 year", "7 years (financial)", "Indefinite"]),
        Question::new(
            "comp_004",
            Compliance,
            High,
            "Are there specific security frameworks to follow? (NIST, CIS, cloud security benchmark)",
        ),
        // Operations
        Question::new(
            "ops_001",
            Operations,
            High,
            "What monitoring solution will be used?",
        )
        .with_examples([
            "Native monitor + log analytics",
            "Datadog",
            "Dynatrace",
            "Hybrid",
        ]),
        Question::new(
            "ops_002",
            Operations,
            High,
            "What are the SLA requirements for production workloads?",
        )
        .with_examples([
            "99.9% (3-9s)",
            "99.95% (zone-redundant)",
            "99.99% (4-9s)",
            "99.999% (5-9s)",
        ]),
        Question::new(
            "ops_003",
            Operations,
            Medium,
            "What is the maintenance window for production systems?",
        )
        .with_examples([
            "Saturday 2-6 AM EST",
            "No maintenance window (always-on)",
            "Flexible",
        ]),
        Question::new(
            "ops_004",
            Operations,
            High,
            "Is automation required for provisioning? (IaC tool preference)",
        )
        .with_examples([
            "Terraform",
            "Bicep",
            "ARM Templates",
            "Pipelines",
            "GitHub Actions",
        ]),
        Question::new(
            "ops_005",
            Operations,
            Medium,
            "What ticketing/ITSM system is used?",
        )
        .with_examples(["ServiceNow", "Jira Service Desk", "BMC Remedy"]),
        // Disaster recovery
        Question::new(
            "dr_001",
            DisasterRecovery,
            Critical,
            "What are the RPO (Recovery Point Objective) requirements?",
        )
        .with_help("How much data loss is acceptable")
        .with_examples(["15 minutes", "1 hour", "4 hours", "24 hours"]),
        Question::new(
            "dr_002",
            DisasterRecovery,
            Critical,
            "What are the RTO (Recovery Time Objective) requirements?",
        )
        .with_help("How quickly must systems be restored")
        .with_examples(["1 hour", "4 hours", "8 hours", "24 hours"]),
        Question::new(
            "dr_003",
            DisasterRecovery,
            High,
            "Is multi-region deployment required for DR?",
        )
        .with_examples([
            "Yes, active-active",
            "Yes, active-passive",
            "No, zone-redundant sufficient",
        ]),
        Question::new(
            "dr_004",
            DisasterRecovery,
            High,
            "What backup retention policy is required?",
        )
        .with_examples([
            "Daily for 30 days",
            "Daily/7d, Weekly/4w, Monthly/12m, Yearly/7y",
        ]),
        // Cost & budgeting
        Question::new(
            "cost_001",
            CostBudgeting,
            Critical,
            "What is the approved cloud budget (Year 1)?",
        )
        .with_examples(["$100K", "$500K", "$1M", "$5M+"]),
        Question::new(
            "cost_002",
            CostBudgeting,
            High,
            "How should costs be allocated? (business unit, project, environment)",
        ),
        Question::new(
            "cost_003",
            CostBudgeting,
            Medium,
            "Are reservations or savings plans being considered?",
        )
        .with_examples([
            "Yes, 1-year commitment",
            "Yes, 3-year commitment",
            "No, pay-as-you-go",
        ]),
        Question::new(
            "cost_004",
            CostBudgeting,
            Medium,
            "What cost alert thresholds should be configured?",
        )
        .with_examples(["80% budget warning, 90% critical", "Monthly variance >10%"]),
        // Integration
        Question::new(
            "int_001",
            Integration,
            High,
            "What on-premises systems need integration with the cloud?",
        )
        .with_examples([
            "Active Directory",
            "SAP",
            "Oracle ERP",
            "File servers",
            "Databases",
        ]),
        Question::new(
            "int_002",
            Integration,
            Medium,
            "Are hybrid file services required?",
        ),
        Question::new(
            "int_003",
            Integration,
            Medium,
            "What third-party SaaS applications need integration?",
        )
        .with_examples(["Salesforce", "Office 365", "ServiceNow", "Workday"]),
        // Workload planning
        Question::new(
            "wkld_001",
            WorkloadPlanning,
            High,
            "How many VMs are expected in Year 1?",
        )
        .with_examples(["<50", "50-200", "200-500", "500+"]),
        Question::new(
            "wkld_002",
            WorkloadPlanning,
            High,
            "What application architectures will be used? (IaaS, PaaS, containers, serverless)",
        ),
        Question::new(
            "wkld_003",
            WorkloadPlanning,
            Medium,
            "Is Kubernetes required? If yes, how many clusters?",
        ),
        Question::new(
            "wkld_004",
            WorkloadPlanning,
            High,
            "What database platforms are needed? (SQL, document store, PostgreSQL, MySQL)",
        ),
    ]
}
