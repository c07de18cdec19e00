//! Venue symbology - explicit order kind/side code tables.
//!
//! Adapters translate domain order kinds and sides into venue codes through
//! a finite table validated for completeness when the adapter is built, so a
//! missing mapping is a construction-time failure rather than a runtime
//! fallback.

use std::collections::HashMap;

use crate::models::{OrderKind, OrderSide};

use super::BrokerError;

/// Validated mapping from domain order kinds and sides to venue codes.
#[derive(Debug, Clone)]
pub struct VenueSymbology {
    kinds: HashMap<OrderKind, String>,
    sides: HashMap<OrderSide, String>,
}

impl VenueSymbology {
    /// Build a symbology table, verifying every domain variant is covered.
    pub fn new(
        kinds: impl IntoIterator<Item = (OrderKind, impl Into<String>)>,
        sides: impl IntoIterator<Item = (OrderSide, impl Into<String>)>,
    ) -> Result<Self, BrokerError> {
        let kinds: HashMap<OrderKind, String> =
            kinds.into_iter().map(|(k, v)| (k, v.into())).collect();
        let sides: HashMap<OrderSide, String> =
            sides.into_iter().map(|(k, v)| (k, v.into())).collect();

        for kind in OrderKind::ALL {
            if !kinds.contains_key(&kind) {
                return Err(BrokerError::IncompleteSymbology(format!(
                    "no venue code for order kind {kind}"
                )));
            }
        }
        for side in OrderSide::ALL {
            if !sides.contains_key(&side) {
                return Err(BrokerError::IncompleteSymbology(format!(
                    "no venue code for side {side}"
                )));
            }
        }

        Ok(Self { kinds, sides })
    }

    /// Venue code for an order kind.
    #[must_use]
    pub fn kind_code(&self, kind: OrderKind) -> &str {
        // Completeness is checked at construction.
        self.kinds.get(&kind).map(String::as_str).unwrap_or_default()
    }

    /// Venue code for an order side.
    #[must_use]
    pub fn side_code(&self, side: OrderSide) -> &str {
        self.sides.get(&side).map(String::as_str).unwrap_or_default()
    }
}
