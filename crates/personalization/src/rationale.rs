//! Rationale rules: an ordered table mapping (segment, product category) to a
//! human-readable explanation. The first matching rule wins.

/// Used when either the segment or the product category is unknown.
pub const PROFILE_RATIONALE: &str = "Recommended based on customer profile";

/// Used when no rule in the table matches.
pub const FALLBACK_RATIONALE: &str = "Recommended based on segment characteristics and product fit";

/// One row of the table. Matching is case-sensitive substring containment on
/// the segment name and, when `category` is set, on the product category.
#[derive(Debug, Clone, PartialEq)]
pub struct RationaleRule {
    pub segment: String,
    pub category: Option<String>,
    pub message: String,
}

impl RationaleRule {
    pub fn new(segment: &str, category: Option<&str>, message: &str) -> Self {
        Self {
            segment: segment.to_string(),
            category: category.map(str::to_string),
            message: message.to_string(),
        }
    }

    pub fn matches(&self, segment: &str, category: &str) -> bool {
        segment.contains(self.segment.as_str())
            && self
                .category
                .as_deref()
                .map_or(true, |c| category.contains(c))
    }
}

#[derive(Debug, Clone)]
pub struct RationaleRules {
    rules: Vec<RationaleRule>,
}

impl RationaleRules {
    /// The banking rule set, in precedence order.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                RationaleRule::new(
                    "Digital",
                    Some("Savings"),
                    "High digital engagement, suitable for online savings products",
                ),
                RationaleRule::new(
                    "High-Value",
                    Some("Investment"),
                    "High income, low risk profile, strong investment potential",
                ),
                RationaleRule::new(
                    "Traditional",
                    Some("Savings"),
                    "Conservative investor, prefers stable savings products",
                ),
                RationaleRule::new("At-Risk", None, "High churn risk, needs retention offer"),
                RationaleRule::new("New", None, "Recent signup, exploring products"),
            ],
        }
    }

    /// Appends a rule with the lowest precedence.
    pub fn with_rule(mut self, rule: RationaleRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[RationaleRule] {
        &self.rules
    }

    pub fn explain(&self, segment: Option<&str>, category: Option<&str>) -> &str {
        let (Some(segment), Some(category)) = (segment, category) else {
            return PROFILE_RATIONALE;
        };
        self.rules
            .iter()
            .find(|rule| rule.matches(segment, category))
            .map(|rule| rule.message.as_str())
            .unwrap_or(FALLBACK_RATIONALE)
    }
}

impl Default for RationaleRules {
    fn default() -> Self {
        Self::standard()
    }
}
