use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Registration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignationBreakdown {
    pub designation: String,
    pub count: usize,
}

impl DesignationBreakdown {
    /// Count registrations per designation, largest group first, ties by name.
    pub fn from_registrations<'a, I>(registrations: I) -> Vec<DesignationBreakdown>
    where
        I: IntoIterator<Item = &'a Registration>,
    {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for registration in registrations {
            *counts.entry(registration.designation.as_str()).or_default() += 1;
        }

        let mut breakdown: Vec<DesignationBreakdown> = counts
            .into_iter()
            .map(|(designation, count)| DesignationBreakdown {
                designation: designation.to_string(),
                count,
            })
            .collect();
        breakdown.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.designation.cmp(&b.designation))
        });

        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(designation: &str) -> Registration {
        Registration {
            designation: designation.to_string(),
            ..Registration::default()
        }
    }

    #[test]
    fn groups_and_orders_designations() {
        let registrations = vec![
            registration("Engineer"),
            registration("Student"),
            registration("Engineer"),
            registration("Designer"),
        ];

        assert_eq!(
            DesignationBreakdown::from_registrations(&registrations),
            vec![
                DesignationBreakdown { designation: "Engineer".into(), count: 2 },
                DesignationBreakdown { designation: "Designer".into(), count: 1 },
                DesignationBreakdown { designation: "Student".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn no_registrations_no_groups() {
        assert!(DesignationBreakdown::from_registrations(&Vec::new()).is_empty());
    }
}
