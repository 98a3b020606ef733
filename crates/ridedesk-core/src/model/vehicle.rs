// ── Vehicles and fixed routes ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::{EntityId, Keyed};

/// Vehicle class offered for booking, with its base fare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: EntityId,
    pub vehicle_type: String,
    /// Base fare.
    pub price: Option<f64>,
    pub price_per_km: Option<f64>,
    pub fixed_routes: Vec<FixedRoute>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Origin-destination pair with a flat price, attached to a vehicle type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedRoute {
    pub id: EntityId,
    pub start: String,
    pub destination: String,
    pub price: Option<f64>,
    /// Back-reference to the owning vehicle type, not ownership.
    pub vehicle_type_id: Option<EntityId>,
}

impl Keyed for Vehicle {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

/// Fleet statistics shown under the vehicle list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FleetSummary {
    pub count: usize,
    pub average_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl FleetSummary {
    pub fn from_vehicles(vehicles: &[Arc<Vehicle>]) -> Self {
        let prices: Vec<f64> = vehicles.iter().filter_map(|v| v.price).collect();
        let max_price = prices.iter().copied().reduce(f64::max);
        let average_price = if prices.is_empty() {
            None
        } else {
            #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
            let n = prices.len() as f64;
            Some(prices.iter().sum::<f64>() / n)
        };
        Self {
            count: vehicles.len(),
            average_price,
            max_price,
        }
    }
}
