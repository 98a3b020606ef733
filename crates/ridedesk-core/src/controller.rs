// ── Controller abstraction ──
//
// Lifecycle management for one console session against the booking
// backend: session setup, list refreshes into the DataStore, and command
// routing with local validation and per-entity in-flight guards.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use ridedesk_api::transport::{TlsMode, TransportConfig};
use ridedesk_api::{AdminClient, Session};

use crate::command::{Command, CommandResult};
use crate::config::{AuthCredentials, ConsoleConfig, TlsVerification};
use crate::error::CoreError;
use crate::filter::{self, SearchQuery};
use crate::lifecycle::BookingState;
use crate::model::{
    Booking, EntityId, EntityKind, FixedRoute, FleetSummary, LegalPage, User, Vehicle,
};
use crate::refund::CancellationDecision;
use crate::store::{DataStore, InFlight, InFlightGuard};

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    /// The backend refused the bearer token; sign in again.
    SessionExpired,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Owns the bearer session,
/// the canonical lists, and the in-flight set that serializes mutating
/// calls per entity.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ConsoleConfig,
    store: Arc<DataStore>,
    session: Arc<Session>,
    client: Mutex<Option<Arc<AdminClient>>>,
    connection_state: watch::Sender<ConnectionState>,
    inflight: Arc<InFlight>,
    /// Records skipped during refresh, and follow-up refreshes that failed
    /// after a successful mutation.
    warnings: Mutex<Vec<String>>,
    /// Why each booking left out of the last bookings refresh was skipped.
    rejected_bookings: Mutex<HashMap<EntityId, String>>,
}

impl Controller {
    /// Create a new Controller from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to establish the session.
    pub fn new(config: ConsoleConfig) -> Self {
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(ControllerInner {
                config,
                store: Arc::new(DataStore::new()),
                session: Arc::new(Session::new()),
                client: Mutex::new(None),
                connection_state,
                inflight: InFlight::new(),
                warnings: Mutex::new(Vec::new()),
                rejected_bookings: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner.session.is_signed_in()
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Build the HTTP client and establish the session from
    /// `ConsoleConfig.auth`. No list is fetched here.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;
        let transport = build_transport(config);
        let client = Arc::new(AdminClient::with_session(
            config.base_url.as_str(),
            &transport,
            Arc::clone(&self.inner.session),
        )?);

        match &config.auth {
            AuthCredentials::Token(token) => {
                self.inner.session.set_token(token.clone());
                debug!("installed bearer token from configuration");
            }
            AuthCredentials::Credentials { email, password } => {
                client.sign_in(email, password).await?;
                debug!(email = %email, "signed in with credentials");
            }
            AuthCredentials::Anonymous => {
                debug!("connected without a session; only public endpoints are usable");
            }
        }

        *self.inner.client.lock().await = Some(client);
        self.inner
            .connection_state
            .send_replace(ConnectionState::Connected);
        info!(backend = %config.base_url, "connected");
        Ok(())
    }

    /// Drop the client and invalidate the in-memory session.
    pub async fn disconnect(&self) {
        self.inner.session.clear();
        *self.inner.client.lock().await = None;
        self.inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Sign in with email and password on an already-connected controller.
    ///
    /// Returns the issued token so the caller can persist it.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SecretString, CoreError> {
        let client = self.client().await?;
        let token = client.sign_in(email, password).await?;
        self.inner
            .connection_state
            .send_replace(ConnectionState::Connected);
        info!(email, "signed in");
        Ok(token)
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    pub async fn oneshot<F, Fut, T>(config: ConsoleConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let controller = Controller::new(config);
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    /// Drain warnings accumulated since the last call.
    pub async fn take_warnings(&self) -> Vec<String> {
        std::mem::take(&mut *self.inner.warnings.lock().await)
    }

    // ── Refresh ──────────────────────────────────────────────────
    //
    // Each refresh replaces its list wholesale. On error the previous
    // list stays in place.

    pub async fn refresh_users(&self) -> Result<usize, CoreError> {
        let client = self.client().await?;
        let records = self.observe(client.list_users().await)?;
        let (users, _) = self.convert_valid(records).await;
        let count = users.len();
        self.inner.store.replace_users(users);
        debug!(count, "users refreshed");
        Ok(count)
    }

    /// Fetch the configured bookings page. Records with an illegal
    /// lifecycle pair are skipped with a warning.
    pub async fn refresh_bookings(&self) -> Result<usize, CoreError> {
        let client = self.client().await?;
        let config = &self.inner.config;
        let records = self.observe(
            client
                .list_bookings(config.booking_page, config.booking_page_size)
                .await,
        )?;
        let (bookings, rejected): (Vec<Booking>, _) = self.convert_valid(records).await;
        let rejected: HashMap<EntityId, String> = rejected
            .into_iter()
            .filter_map(|e| match e {
                CoreError::InvalidRecord {
                    identifier, reason, ..
                } => Some((EntityId::from(identifier), reason)),
                _ => None,
            })
            .collect();
        let count = bookings.len();
        self.inner.store.replace_bookings(bookings);
        *self.inner.rejected_bookings.lock().await = rejected;
        debug!(count, "bookings refreshed");
        Ok(count)
    }

    pub async fn refresh_vehicles(&self) -> Result<usize, CoreError> {
        let client = self.client().await?;
        let records = self.observe(client.list_vehicles().await)?;
        let vehicles: Vec<Vehicle> = records.into_iter().map(Vehicle::from).collect();
        let count = vehicles.len();
        self.inner.store.replace_vehicles(vehicles);
        debug!(count, "vehicles refreshed");
        Ok(count)
    }

    pub async fn refresh_legal_pages(&self) -> Result<usize, CoreError> {
        let client = self.client().await?;
        let records = self.observe(client.list_legal_pages().await)?;
        let (pages, _): (Vec<LegalPage>, _) = self.convert_valid(records).await;
        let count = pages.len();
        self.inner.store.replace_legal_pages(pages);
        debug!(count, "legal pages refreshed");
        Ok(count)
    }

    // ── Views ────────────────────────────────────────────────────
    //
    // Pure projections over the canonical lists; none of these touch the
    // network or modify the store.

    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.inner.store.users_snapshot()
    }

    pub fn bookings_snapshot(&self) -> Arc<Vec<Arc<Booking>>> {
        self.inner.store.bookings_snapshot()
    }

    pub fn vehicles_snapshot(&self) -> Arc<Vec<Arc<Vehicle>>> {
        self.inner.store.vehicles_snapshot()
    }

    pub fn legal_pages_snapshot(&self) -> Arc<Vec<Arc<LegalPage>>> {
        self.inner.store.legal_pages_snapshot()
    }

    pub fn users(&self, query: &SearchQuery) -> Vec<Arc<User>> {
        filter::filter_users(&self.users_snapshot(), query)
    }

    /// Matching bookings, ascending by trip time.
    pub fn bookings(&self, query: &SearchQuery) -> Vec<Arc<Booking>> {
        filter::filter_bookings(&self.bookings_snapshot(), query)
    }

    /// Matching bookings restricted to one lifecycle state.
    pub fn bookings_in_state(&self, query: &SearchQuery, state: BookingState) -> Vec<Arc<Booking>> {
        self.bookings(query)
            .into_iter()
            .filter(|b| b.state == state)
            .collect()
    }

    pub fn vehicles(&self, query: &SearchQuery) -> Vec<Arc<Vehicle>> {
        filter::filter(&self.vehicles_snapshot(), query)
    }

    pub fn legal_pages(&self, query: &SearchQuery) -> Vec<Arc<LegalPage>> {
        filter::filter(&self.legal_pages_snapshot(), query)
    }

    pub fn fleet_summary(&self) -> FleetSummary {
        FleetSummary::from_vehicles(&self.vehicles_snapshot())
    }

    pub fn user(&self, id: &EntityId) -> Option<Arc<User>> {
        self.inner.store.user_by_id(id)
    }

    pub fn booking(&self, id: &EntityId) -> Option<Arc<Booking>> {
        self.inner.store.booking_by_id(id)
    }

    /// Why the booking was left out of the last refresh, if it was.
    pub async fn rejected_booking(&self, id: &EntityId) -> Option<String> {
        self.inner.rejected_bookings.lock().await.get(id).cloned()
    }

    pub fn vehicle(&self, id: &EntityId) -> Option<Arc<Vehicle>> {
        self.inner.store.vehicle_by_id(id)
    }

    pub fn route(&self, id: &EntityId) -> Option<FixedRoute> {
        self.inner.store.route_by_id(id)
    }

    pub fn legal_page(&self, id: &EntityId) -> Option<Arc<LegalPage>> {
        self.inner.store.legal_page_by_id(id)
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a write command.
    ///
    /// Local validation runs first; a command that fails it never reaches
    /// the backend. On success the affected list is re-fetched.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        route_command(self, cmd).await
    }

    /// Approve a pending cancellation with the operator's refund text.
    pub async fn approve_cancellation(
        &self,
        booking_id: &EntityId,
        refund_text: &str,
        comment: &str,
    ) -> Result<(), CoreError> {
        let decision = CancellationDecision::approve(refund_text, comment)?;
        self.decide(booking_id, decision).await
    }

    /// Reject a pending cancellation. No refund is issued.
    pub async fn reject_cancellation(
        &self,
        booking_id: &EntityId,
        comment: &str,
    ) -> Result<(), CoreError> {
        let decision = CancellationDecision::reject(comment)?;
        self.decide(booking_id, decision).await
    }

    async fn decide(
        &self,
        booking_id: &EntityId,
        decision: CancellationDecision,
    ) -> Result<(), CoreError> {
        self.execute(Command::DecideCancellation {
            booking_id: booking_id.clone(),
            decision,
        })
        .await
        .map(|_| ())
    }

    // ── Internals ────────────────────────────────────────────────

    async fn client(&self) -> Result<Arc<AdminClient>, CoreError> {
        self.inner
            .client
            .lock()
            .await
            .clone()
            .ok_or(CoreError::ControllerDisconnected)
    }

    /// Map a transport result, flipping to `SessionExpired` on auth failure.
    fn observe<T>(&self, result: Result<T, ridedesk_api::Error>) -> Result<T, CoreError> {
        result.map_err(|e| {
            if e.is_auth_error() {
                self.inner.connection_state.send_if_modified(|state| {
                    if *state == ConnectionState::Connected {
                        warn!(error = %e, "session rejected by backend");
                        *state = ConnectionState::SessionExpired;
                        true
                    } else {
                        false
                    }
                });
            }
            CoreError::from(e)
        })
    }

    /// Convert wire records, keeping the valid ones. Each rejected record
    /// is recorded as a warning and returned alongside.
    async fn convert_valid<R, T>(&self, records: Vec<R>) -> (Vec<T>, Vec<CoreError>)
    where
        T: TryFrom<R, Error = CoreError>,
    {
        let mut out = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();
        for record in records {
            match T::try_from(record) {
                Ok(item) => out.push(item),
                Err(e) => {
                    warn!(error = %e, "skipping invalid record");
                    skipped.push(e);
                }
            }
        }
        if !skipped.is_empty() {
            self.inner
                .warnings
                .lock()
                .await
                .extend(skipped.iter().map(ToString::to_string));
        }
        (out, skipped)
    }

    fn acquire(&self, kind: EntityKind, id: &EntityId) -> Result<InFlightGuard, CoreError> {
        self.inner
            .inflight
            .try_acquire(kind, id)
            .ok_or_else(|| CoreError::Busy {
                entity_type: kind.to_string(),
                identifier: id.to_string(),
            })
    }

    /// Follow-up refresh after a successful mutation. The mutation already
    /// took effect, so a failure here is only a warning.
    async fn refresh_after(&self, kind: EntityKind) {
        let result = match kind {
            EntityKind::User => self.refresh_users().await,
            EntityKind::Booking => self.refresh_bookings().await,
            EntityKind::Vehicle | EntityKind::Route => self.refresh_vehicles().await,
            EntityKind::LegalPage => self.refresh_legal_pages().await,
        };
        if let Err(e) = result {
            let msg = format!("{kind} list could not be refreshed: {e}");
            warn!("{msg}");
            self.inner.warnings.lock().await.push(msg);
        }
    }

    /// Look up a booking, loading the list first if it was never fetched.
    async fn require_booking(&self, id: &EntityId) -> Result<Arc<Booking>, CoreError> {
        if self.inner.store.bookings_fetched_at().is_none() {
            self.refresh_bookings().await?;
        }
        if let Some(booking) = self.booking(id) {
            return Ok(booking);
        }
        Err(match self.rejected_booking(id).await {
            Some(reason) => CoreError::InvalidRecord {
                entity_type: EntityKind::Booking.to_string(),
                identifier: id.to_string(),
                reason,
            },
            None => CoreError::NotFound {
                entity_type: EntityKind::Booking.to_string(),
                identifier: id.to_string(),
            },
        })
    }
}

// ── Command routing ──────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
async fn route_command(controller: &Controller, cmd: Command) -> Result<CommandResult, CoreError> {
    let name = cmd.name();

    match cmd {
        // ── Users ────────────────────────────────────────────────
        Command::SuspendUser { id } => {
            let client = controller.client().await?;
            let _guard = controller.acquire(EntityKind::User, &id)?;
            controller.observe(client.suspend_user(id.as_str()).await)?;
            info!(user = %id, "user suspension toggled");
            controller.refresh_after(EntityKind::User).await;
            Ok(CommandResult::Ok)
        }

        Command::DeleteUser { id } => {
            let client = controller.client().await?;
            let _guard = controller.acquire(EntityKind::User, &id)?;
            controller.observe(client.delete_user(id.as_str()).await)?;
            info!(user = %id, "user deleted");
            controller.refresh_after(EntityKind::User).await;
            Ok(CommandResult::Ok)
        }

        // ── Bookings ─────────────────────────────────────────────
        Command::DecideCancellation {
            booking_id,
            decision,
        } => {
            let client = controller.client().await?;
            let booking = controller.require_booking(&booking_id).await?;
            let next = decision.check_against(&booking)?;
            let _guard = controller.acquire(EntityKind::Booking, &booking_id)?;

            let idempotency_key = Uuid::new_v4();
            controller.observe(
                client
                    .handle_cancellation(booking_id.as_str(), &decision.to_wire(), idempotency_key)
                    .await,
            )?;
            info!(
                booking = %booking_id,
                action = %decision.action(),
                refund = %decision.refund(),
                state = %next,
                "cancellation decision recorded"
            );
            controller.refresh_after(EntityKind::Booking).await;
            Ok(CommandResult::Ok)
        }

        Command::SendCustomerEmail {
            booking_id,
            request,
        } => {
            request.validate()?;
            let client = controller.client().await?;
            let _guard = controller.acquire(EntityKind::Booking, &booking_id)?;
            controller.observe(client.send_customer_email(&request.to_wire()).await)?;
            info!(booking = %booking_id, to = %request.email, "customer e-mail sent");
            Ok(CommandResult::Ok)
        }

        // ── Vehicles ─────────────────────────────────────────────
        Command::CreateVehicle(request) => {
            request.validate()?;
            let client = controller.client().await?;
            let record = controller.observe(client.create_vehicle(&request.to_wire()).await)?;
            let vehicle = Vehicle::from(record);
            info!(vehicle = %vehicle.id, vehicle_type = %vehicle.vehicle_type, "vehicle created");
            controller.refresh_after(EntityKind::Vehicle).await;
            Ok(CommandResult::Vehicle(vehicle))
        }

        Command::UpdateVehicle { id, request } => {
            request.validate()?;
            let client = controller.client().await?;
            let _guard = controller.acquire(EntityKind::Vehicle, &id)?;
            let record =
                controller.observe(client.update_vehicle(id.as_str(), &request.to_wire()).await)?;
            info!(vehicle = %id, "vehicle updated");
            controller.refresh_after(EntityKind::Vehicle).await;
            Ok(CommandResult::Vehicle(Vehicle::from(record)))
        }

        Command::UpdateRoutePrice { route_id, request } => {
            request.validate()?;
            let client = controller.client().await?;
            let _guard = controller.acquire(EntityKind::Route, &route_id)?;
            let record = controller
                .observe(client.update_route(route_id.as_str(), &request.to_wire()).await)?;
            info!(route = %route_id, price = request.price, "route price updated");
            controller.refresh_after(EntityKind::Route).await;
            Ok(CommandResult::Route(FixedRoute::from(record)))
        }

        // ── Legal pages ──────────────────────────────────────────
        Command::CreateLegalPage(request) => {
            request.validate()?;
            let client = controller.client().await?;
            let record = controller.observe(client.create_legal_page(&request.to_wire()).await)?;
            info!(page_title = %request.page_title, "legal page created");
            controller.refresh_after(EntityKind::LegalPage).await;
            Ok(legal_result(name, record))
        }

        Command::UpdateLegalPage { id, request } => {
            request.validate()?;
            let client = controller.client().await?;
            let _guard = controller.acquire(EntityKind::LegalPage, &id)?;
            let record = controller
                .observe(client.update_legal_page(id.as_str(), &request.to_wire()).await)?;
            info!(page = %id, "legal page updated");
            controller.refresh_after(EntityKind::LegalPage).await;
            Ok(legal_result(name, record))
        }
    }
}

/// The backend echoes the page, but older records may lack an id; the
/// write still succeeded in that case.
fn legal_result(command: &str, record: ridedesk_api::models::LegalRecord) -> CommandResult {
    match LegalPage::try_from(record) {
        Ok(page) => CommandResult::LegalPage(page),
        Err(e) => {
            debug!(command, error = %e, "response page not usable");
            CommandResult::Ok
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &ConsoleConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
