//! Static agent catalog: category -> keyword -> agents, plus display metadata.
//!
//! Weights are kept in hundredths so that category sums stay exact and ties
//! compare equal instead of drifting by a float ulp.

/// Marketplace the install commands point at
pub const INSTALL_SOURCE: &str = "wshobson";

/// Weight applied to a category missing from the weight table (0.05)
pub const FALLBACK_WEIGHT: u32 = 5;

/// Description used for agents missing from [`AGENT_INFO`]
pub const FALLBACK_DESCRIPTION: &str = "Specialized expert agent";

/// Verbs that mark a prompt as a planning-type request
pub const INTENT_KEYWORDS: &[&str] = &[
    "plan",
    "build",
    "create",
    "design",
    "architecture",
    "implement",
    "develop",
];

/// A named group of keyword rules
#[derive(Debug)]
pub struct Category {
    pub name: &'static str,
    pub entries: &'static [(&'static str, &'static [&'static str])],
}

/// Category weights in scan order. Relative ordering is policy, not derived.
pub const CATEGORY_WEIGHTS: &[(&str, u32)] = &[
    ("languages", 40),
    ("domains", 30),
    ("infrastructure", 15),
    ("data", 10),
    ("security", 10),
    ("quality", 5),
    ("operations", 5),
];

/// Look up a category weight, falling back to [`FALLBACK_WEIGHT`]
pub fn category_weight(name: &str) -> u32 {
    CATEGORY_WEIGHTS
        .iter()
        .find(|(category, _)| *category == name)
        .map(|(_, weight)| *weight)
        .unwrap_or(FALLBACK_WEIGHT)
}

pub const AGENT_CATALOG: &[Category] = &[
    Category {
        name: "languages",
        entries: &[
            ("python", &["python-expert"]),
            ("javascript", &["javascript-expert"]),
            ("typescript", &["javascript-expert"]),
            ("java", &["jvm-expert"]),
            ("kotlin", &["jvm-expert"]),
            ("scala", &["jvm-expert"]),
            ("rust", &["systems-expert"]),
            ("c", &["systems-expert"]),
            ("cpp", &["systems-expert"]),
            ("go", &["systems-expert"]),
            ("bash", &["scripting-expert"]),
            ("powershell", &["scripting-expert"]),
            ("haskell", &["functional-expert"]),
            ("elixir", &["functional-expert"]),
            ("embedded", &["embedded-expert"]),
        ],
    },
    Category {
        name: "domains",
        entries: &[
            ("backend", &["backend-expert"]),
            ("frontend", &["frontend-expert"]),
            ("api", &["backend-expert"]),
            ("web", &["frontend-expert", "backend-expert"]),
            ("mobile", &["multi-platform-expert"]),
            ("ml", &["llm-expert", "mlops-expert"]),
            ("ai", &["llm-expert", "agent-expert"]),
            ("llm", &["llm-expert", "context-expert"]),
            ("blockchain", &["blockchain-expert"]),
            ("defi", &["blockchain-expert"]),
            ("web3", &["blockchain-expert"]),
            ("fintech", &["finance-expert", "payments-expert"]),
            ("trading", &["finance-expert"]),
            ("payments", &["payments-expert"]),
            ("seo", &["seo-expert"]),
            ("analytics", &["analytics-expert"]),
            ("gaming", &["gaming-expert"]),
        ],
    },
    Category {
        name: "infrastructure",
        entries: &[
            ("kubernetes", &["kubernetes-expert"]),
            ("k8s", &["kubernetes-expert"]),
            ("docker", &["deployment-expert"]),
            ("cicd", &["cicd-expert"]),
            ("ci/cd", &["cicd-expert"]),
            ("aws", &["cloud-expert"]),
            ("azure", &["cloud-expert"]),
            ("gcp", &["cloud-expert"]),
            ("cloud", &["cloud-expert"]),
            ("terraform", &["infrastructure-expert"]),
            ("deployment", &["deployment-expert"]),
        ],
    },
    Category {
        name: "data",
        entries: &[
            ("database", &["database-expert"]),
            ("postgres", &["database-expert"]),
            ("mysql", &["database-expert"]),
            ("mongodb", &["database-expert"]),
            ("sql", &["database-expert"]),
            ("migration", &["migration-expert"]),
            ("etl", &["data-engineering-expert"]),
            ("pipeline", &["data-engineering-expert"]),
            ("data", &["data-engineering-expert", "data-validation-expert"]),
        ],
    },
    Category {
        name: "security",
        entries: &[
            ("security", &["security-expert"]),
            ("auth", &["security-expert", "api-security-expert"]),
            ("authentication", &["security-expert"]),
            ("compliance", &["compliance-expert"]),
            ("gdpr", &["compliance-expert"]),
            ("vulnerability", &["security-expert"]),
            ("mobile-security", &["mobile-security-expert"]),
        ],
    },
    Category {
        name: "quality",
        entries: &[
            ("testing", &["testing-expert"]),
            ("tdd", &["tdd-expert"]),
            ("test", &["testing-expert"]),
            ("quality", &["quality-expert"]),
            ("review", &["code-review-expert"]),
            ("performance", &["performance-expert"]),
            ("optimization", &["performance-expert"]),
        ],
    },
    Category {
        name: "operations",
        entries: &[
            ("monitoring", &["operations-expert"]),
            ("incident", &["operations-expert"]),
            ("debugging", &["debugging-expert"]),
            ("diagnostics", &["operations-expert"]),
            ("observability", &["operations-expert"]),
        ],
    },
];

pub const AGENT_INFO: &[(&str, &str)] = &[
    ("python-expert", "Python development, Django, Flask, data science"),
    ("javascript-expert", "JS/TS, Node.js, React, Vue, modern frameworks"),
    ("jvm-expert", "Java, Kotlin, Scala, Spring ecosystem"),
    ("systems-expert", "C/C++, Rust, Go, low-level programming"),
    ("scripting-expert", "Bash, PowerShell, automation scripts"),
    ("functional-expert", "Haskell, Elixir, functional programming"),
    ("embedded-expert", "IoT, firmware, hardware integration"),
    ("backend-expert", "Backend APIs, microservices, server architecture"),
    ("frontend-expert", "React, Vue, UI/UX, responsive design"),
    ("multi-platform-expert", "React Native, Flutter, cross-platform"),
    ("llm-expert", "LangChain, RAG, prompt engineering, LLMs"),
    ("agent-expert", "Multi-agent systems, orchestration"),
    ("context-expert", "Vector DB, memory systems, context management"),
    ("mlops-expert", "ML pipelines, model deployment, MLOps"),
    ("blockchain-expert", "Smart contracts, DeFi, Web3 protocols"),
    ("finance-expert", "Quantitative trading, risk management"),
    ("payments-expert", "Stripe, PayPal, billing integration"),
    ("kubernetes-expert", "K8s, Helm, container orchestration"),
    ("cloud-expert", "AWS/Azure/GCP architecture, cloud services"),
    ("deployment-expert", "CI/CD, releases, deployment automation"),
    ("infrastructure-expert", "Terraform, IaC, infrastructure provisioning"),
    ("cicd-expert", "GitHub Actions, Jenkins, CI/CD pipelines"),
    ("database-expert", "Schema design, optimization, SQL/NoSQL"),
    ("migration-expert", "Database migrations, data modeling"),
    ("data-engineering-expert", "ETL pipelines, data lakes, big data"),
    ("data-validation-expert", "Schema validation, data quality"),
    ("security-expert", "OWASP, vulnerability scanning, secure coding"),
    ("compliance-expert", "GDPR, SOC2, security compliance"),
    ("api-security-expert", "API auth, rate limiting, security"),
    ("mobile-security-expert", "Mobile app security, MASVS standards"),
    ("testing-expert", "Unit/integration testing, test automation"),
    ("tdd-expert", "Test-driven development workflows"),
    ("quality-expert", "Code quality, static analysis, standards"),
    ("code-review-expert", "Code review best practices, patterns"),
    ("performance-expert", "Profiling, optimization, benchmarking"),
    ("operations-expert", "Incident response, monitoring, on-call"),
    ("debugging-expert", "Complex debugging, profiling, diagnostics"),
    ("seo-expert", "SEO content, technical optimization"),
    ("analytics-expert", "Business intelligence, metrics, dashboards"),
    ("gaming-expert", "Game development, engines, multiplayer"),
];

/// Description for an agent, never missing
pub fn describe_agent(name: &str) -> &'static str {
    AGENT_INFO
        .iter()
        .find(|(agent, _)| *agent == name)
        .map(|(_, description)| *description)
        .unwrap_or(FALLBACK_DESCRIPTION)
}
