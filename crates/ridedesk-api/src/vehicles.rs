// Vehicle and fixed-route endpoints

use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{
    CreateVehicleBody, FixedRouteRecord, UpdateRouteBody, UpdateVehicleBody, VehicleRecord,
};

impl AdminClient {
    /// `GET /vehicles` → `Vehicle[]` (bare array, no envelope)
    pub async fn list_vehicles(&self) -> Result<Vec<VehicleRecord>, Error> {
        let vehicles: Vec<VehicleRecord> = self.get(&["vehicles"], &[]).await?;
        debug!(count = vehicles.len(), "fetched vehicles");
        Ok(vehicles)
    }

    /// `POST /vehicles` with `{vehicleType, price}`
    pub async fn create_vehicle(&self, body: &CreateVehicleBody) -> Result<VehicleRecord, Error> {
        debug!(vehicle_type = %body.vehicle_type, "creating vehicle");
        self.post(&["vehicles"], body).await
    }

    /// `PATCH /vehicles/{id}/edit` with `{price, pricePerKm}`
    pub async fn update_vehicle(
        &self,
        id: &str,
        body: &UpdateVehicleBody,
    ) -> Result<VehicleRecord, Error> {
        debug!(id, "updating vehicle");
        self.patch(&["vehicles", id, "edit"], body).await
    }

    /// `PATCH /vehicles/{route_id}/route/edit` with `{price}`
    pub async fn update_route(
        &self,
        route_id: &str,
        body: &UpdateRouteBody,
    ) -> Result<FixedRouteRecord, Error> {
        debug!(route_id, "updating fixed route price");
        self.patch(&["vehicles", route_id, "route", "edit"], body)
            .await
    }
}
