//! マーケティングページの静的コンテンツ

use ledgerlift_common::DemoKind;

#[derive(Debug)]
pub struct PricingTier {
    pub name: &'static str,
    pub price: &'static str,
    pub period: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub highlighted: bool,
    pub cta: &'static str,
}

pub static PRICING_TIERS: &[PricingTier] = &[
    PricingTier {
        name: "Starter",
        price: "£49",
        period: "per month",
        description: "For sole practitioners getting started with automation.",
        features: &[
            "Up to 3 client entities",
            "Invoice extraction (250 documents / month)",
            "Bank reconciliation",
            "Email support",
        ],
        highlighted: false,
        cta: "Start free trial",
    },
    PricingTier {
        name: "Practice",
        price: "£149",
        period: "per month",
        description: "For growing firms running month-end for many clients.",
        features: &[
            "Up to 25 client entities",
            "Invoice extraction (2,000 documents / month)",
            "Bank, AP and AR reconciliation",
            "Expense and receipt matching",
            "Spreadsheet exports",
            "Priority support",
        ],
        highlighted: true,
        cta: "Start free trial",
    },
    PricingTier {
        name: "Enterprise",
        price: "Custom",
        period: "annual contract",
        description: "For multi-office firms with bespoke workflows.",
        features: &[
            "Unlimited client entities",
            "10-K and annual report analysis",
            "Single sign-on",
            "Dedicated success manager",
            "Custom data retention",
        ],
        highlighted: false,
        cta: "Talk to sales",
    },
];

#[derive(Debug)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
    /// 試せるデモがあれば
    pub demo: Option<DemoKind>,
}

pub static FEATURES: &[Feature] = &[
    Feature {
        title: "Invoice extraction",
        description: "Pull supplier, dates, VAT and totals out of PDFs and photos without retyping.",
        demo: Some(DemoKind::Invoice),
    },
    Feature {
        title: "Bank reconciliation",
        description: "Match statement lines to ledger entries and surface only the exceptions.",
        demo: Some(DemoKind::BankRec),
    },
    Feature {
        title: "Supplier statement reconciliation",
        description: "Compare supplier statements with your AP ledger: mismatches, missing invoices and duplicates.",
        demo: Some(DemoKind::ApRec),
    },
    Feature {
        title: "Customer statement reconciliation",
        description: "Reconcile customer statements against the AR ledger before chasing payments.",
        demo: Some(DemoKind::ArRec),
    },
    Feature {
        title: "Expense matching",
        description: "Pair card transactions with receipts and categorise spend automatically.",
        demo: Some(DemoKind::Expenses),
    },
    Feature {
        title: "10-K analysis",
        description: "Turn an annual report into a three-year income statement and two-year balance sheet.",
        demo: Some(DemoKind::TenK),
    },
    Feature {
        title: "Spreadsheet exports",
        description: "Download every result as a spreadsheet ready for the working papers.",
        demo: None,
    },
];

#[derive(Debug)]
pub struct BlogPost {
    pub slug: &'static str,
    pub title: &'static str,
    pub date: &'static str,
    pub author: &'static str,
    pub summary: &'static str,
    pub body: &'static [&'static str],
}

pub static BLOG_POSTS: &[BlogPost] = &[
    BlogPost {
        slug: "month-end-close-in-a-day",
        title: "Closing the month in a day",
        date: "2024-03-04",
        author: "LedgerLift team",
        summary: "What changes when reconciliations only show you the exceptions.",
        body: &[
            "Most of month-end is spent confirming that things which match, match.",
            "Automated matching flips that around: the review starts from the short list of items that need judgement.",
            "Firms using exception-first reconciliation report closing client books in a single working day.",
        ],
    },
    BlogPost {
        slug: "supplier-statements-without-tears",
        title: "Supplier statements without tears",
        date: "2024-02-12",
        author: "LedgerLift team",
        summary: "A practical checklist for reconciling supplier statements against the purchase ledger.",
        body: &[
            "Start with the totals: if the statement and ledger agree, the remaining work is mostly timing.",
            "Missing invoices usually mean a posting backlog; duplicates usually mean a resent PDF.",
            "Amount mismatches are worth a call to the supplier before anything is adjusted.",
        ],
    },
    BlogPost {
        slug: "reading-a-10k-quickly",
        title: "Reading a 10-K quickly",
        date: "2024-01-22",
        author: "LedgerLift team",
        summary: "Which lines of an annual report matter for a first-pass review.",
        body: &[
            "Revenue trend, gross margin and net income over three years tell most of the story.",
            "On the balance sheet, compare liabilities with equity year on year before reading the notes.",
        ],
    },
];

pub fn find_post(slug: &str) -> Option<&'static BlogPost> {
    BLOG_POSTS.iter().find(|post| post.slug == slug)
}
