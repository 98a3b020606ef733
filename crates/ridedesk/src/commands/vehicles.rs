//! Vehicle and fixed-route command handlers.

use std::sync::Arc;

use tabled::Tabled;

use ridedesk_core::{
    Command as CoreCommand, CommandResult, Controller, CreateVehicleRequest, FixedRoute,
    FleetSummary, UpdateRoutePriceRequest, UpdateVehicleRequest, Vehicle,
};

use crate::cli::{GlobalOpts, OutputFormat, VehiclesArgs, VehiclesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct VehicleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    vehicle_type: String,
    #[tabled(rename = "Base fare")]
    price: String,
    #[tabled(rename = "Per km")]
    price_per_km: String,
    #[tabled(rename = "Routes")]
    routes: usize,
}

impl From<&Arc<Vehicle>> for VehicleRow {
    fn from(v: &Arc<Vehicle>) -> Self {
        Self {
            id: v.id.to_string(),
            vehicle_type: v.vehicle_type.clone(),
            price: output::fmt_money(v.price),
            price_per_km: output::fmt_money(v.price_per_km),
            routes: v.fixed_routes.len(),
        }
    }
}

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "From")]
    start: String,
    #[tabled(rename = "To")]
    destination: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&FixedRoute> for RouteRow {
    fn from(r: &FixedRoute) -> Self {
        Self {
            id: r.id.to_string(),
            start: r.start.clone(),
            destination: r.destination.clone(),
            price: output::fmt_money(r.price),
        }
    }
}

fn vehicle_detail(v: &Vehicle) -> String {
    [
        format!("ID:         {}", v.id),
        format!("Type:       {}", v.vehicle_type),
        format!("Base fare:  {}", output::fmt_money(v.price)),
        format!("Per km:     {}", output::fmt_money(v.price_per_km)),
        format!("Routes:     {}", v.fixed_routes.len()),
    ]
    .join("\n")
}

fn route_detail(r: &FixedRoute) -> String {
    [
        format!("ID:     {}", r.id),
        format!("Route:  {} → {}", r.start, r.destination),
        format!("Price:  {}", output::fmt_money(r.price)),
    ]
    .join("\n")
}

/// Statistics line shown under the vehicle table.
fn summary_line(s: &FleetSummary) -> String {
    format!(
        "{} vehicle types, average base fare {}, highest {}",
        s.count,
        output::fmt_money(s.average_price),
        output::fmt_money(s.max_price)
    )
}

// ── Local checks ────────────────────────────────────────────────────

pub fn validate(cmd: &VehiclesCommand) -> Result<(), CliError> {
    match cmd {
        VehiclesCommand::List(_) => {}
        VehiclesCommand::Routes { vehicle } => {
            util::entity_id(vehicle, "vehicle")?;
        }
        VehiclesCommand::Create {
            vehicle_type,
            price,
        } => CreateVehicleRequest {
            vehicle_type: vehicle_type.clone(),
            price: *price,
        }
        .validate()?,
        VehiclesCommand::Update {
            vehicle,
            price,
            price_per_km,
        } => {
            util::entity_id(vehicle, "vehicle")?;
            UpdateVehicleRequest {
                price: *price,
                price_per_km: *price_per_km,
            }
            .validate()?;
        }
        VehiclesCommand::RoutePrice { route, price } => {
            util::entity_id(route, "route")?;
            UpdateRoutePriceRequest { price: *price }.validate()?;
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: VehiclesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VehiclesCommand::List(search) => {
            controller.refresh_vehicles().await?;
            let vehicles = controller.vehicles(&util::query(&search));
            let out = output::render_list(
                &global.output,
                &vehicles,
                |v| VehicleRow::from(v),
                |v| v.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) {
                output::print_output(&summary_line(&controller.fleet_summary()), global.quiet);
            }
            Ok(())
        }

        VehiclesCommand::Routes { vehicle } => {
            let id = util::entity_id(&vehicle, "vehicle")?;
            controller.refresh_vehicles().await?;
            let found = controller
                .vehicle(&id)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "vehicle".into(),
                    identifier: vehicle,
                    list_command: "vehicles list".into(),
                })?;
            let out = output::render_list(
                &global.output,
                &found.fixed_routes,
                |r| RouteRow::from(r),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VehiclesCommand::Create {
            vehicle_type,
            price,
        } => {
            let result = controller
                .execute(CoreCommand::CreateVehicle(CreateVehicleRequest {
                    vehicle_type,
                    price,
                }))
                .await?;
            print_result(&result, global)
        }

        VehiclesCommand::Update {
            vehicle,
            price,
            price_per_km,
        } => {
            let id = util::entity_id(&vehicle, "vehicle")?;
            let result = controller
                .execute(CoreCommand::UpdateVehicle {
                    id,
                    request: UpdateVehicleRequest {
                        price,
                        price_per_km,
                    },
                })
                .await?;
            print_result(&result, global)
        }

        VehiclesCommand::RoutePrice { route, price } => {
            let route_id = util::entity_id(&route, "route")?;
            let result = controller
                .execute(CoreCommand::UpdateRoutePrice {
                    route_id,
                    request: UpdateRoutePriceRequest { price },
                })
                .await?;
            print_result(&result, global)
        }
    }
}

fn print_result(result: &CommandResult, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match result {
        CommandResult::Vehicle(v) => {
            output::render_single(&global.output, v, vehicle_detail, |v| v.id.to_string())?
        }
        CommandResult::Route(r) => {
            output::render_single(&global.output, r, route_detail, |r| r.id.to_string())?
        }
        CommandResult::Ok | CommandResult::LegalPage(_) => String::new(),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
