//! Refresh-cycle coordination.
//!
//! One end-to-end attempt to resolve a location and produce a snapshot is a
//! refresh cycle. Cycles are stamped with a monotonically increasing token;
//! only the cycle holding the newest token may commit results, update
//! persistent state, or touch the presentation sink. Superseded cycles run
//! to completion but their results (and their errors) are inert.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Local;
use futures::join;
use tracing::{debug, info, warn};

use crate::Result;
use crate::api::OpenMeteoApi;
use crate::config::AeroPulseConfig;
use crate::geolocate::{self, Geolocator};
use crate::location_resolver::{LocationResolver, UNKNOWN_LOCATION};
use crate::models::{
    Coordinates, RecentCities, Snapshot, StoredLocation, UnitPreference, normalize_city_text,
};
use crate::sink::{PresentationSink, Status};
use crate::store::PreferenceStore;

/// What a refresh cycle should anchor on.
#[derive(Debug, Clone)]
pub enum Locus {
    /// Free-form city name to resolve
    City(String),
    /// Explicit coordinates, with an optional pre-resolved label
    Coordinates {
        coords: Coordinates,
        label_hint: Option<String>,
    },
    /// Device position
    Device,
}

/// Per-cycle presentation options.
#[derive(Debug, Clone)]
pub struct RefreshOptions {
    pub loading_text: String,
    pub ready_text: String,
    /// Push the resolved city onto the recent list after a commit
    pub remember_city: bool,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self::with_status("Syncing weather", "Live stream")
    }
}

impl RefreshOptions {
    #[must_use]
    pub fn with_status(loading: &str, ready: &str) -> Self {
        Self {
            loading_text: loading.to_string(),
            ready_text: ready.to_string(),
            remember_city: true,
        }
    }
}

/// Outcome of a refresh cycle.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The cycle held the newest token through commit.
    Committed(Arc<Snapshot>),
    /// A newer cycle superseded this one; all results were discarded.
    Superseded,
}

impl RefreshOutcome {
    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            RefreshOutcome::Committed(snapshot) => Some(snapshot),
            RefreshOutcome::Superseded => None,
        }
    }
}

/// Locus with the device position already resolved.
enum CycleLocus {
    City(String),
    Coordinates {
        coords: Coordinates,
        label_hint: Option<String>,
    },
}

/// Shared mutable state, written only from the commit step of a non-stale
/// cycle.
struct SharedState {
    snapshot: Option<Arc<Snapshot>>,
    last_coords: Option<Coordinates>,
    location_label: String,
    recent_cities: RecentCities,
    unit: UnitPreference,
    in_flight: u32,
}

/// Owns the refresh pipeline and every piece of shared state around it.
pub struct RequestCoordinator {
    api: Arc<dyn OpenMeteoApi>,
    geolocator: Arc<dyn Geolocator>,
    sink: Arc<dyn PresentationSink>,
    prefs: Option<PreferenceStore>,
    config: AeroPulseConfig,
    active_request: AtomicU64,
    visible: AtomicBool,
    state: Mutex<SharedState>,
}

impl RequestCoordinator {
    pub fn new(
        api: Arc<dyn OpenMeteoApi>,
        geolocator: Arc<dyn Geolocator>,
        sink: Arc<dyn PresentationSink>,
        prefs: Option<PreferenceStore>,
        config: AeroPulseConfig,
    ) -> Self {
        let recent_limit = config.defaults.recent_city_limit;
        Self {
            api,
            geolocator,
            sink,
            prefs,
            config,
            active_request: AtomicU64::new(0),
            visible: AtomicBool::new(true),
            state: Mutex::new(SharedState {
                snapshot: None,
                last_coords: None,
                location_label: String::new(),
                recent_cities: RecentCities::new(recent_limit),
                unit: UnitPreference::default(),
                in_flight: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_token(&self) -> u64 {
        self.active_request.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.active_request.load(Ordering::SeqCst) == token
    }

    /// Whether a cycle is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state().in_flight > 0
    }

    /// The committed snapshot of the most recent non-stale cycle, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state().snapshot.clone()
    }

    #[must_use]
    pub fn unit(&self) -> UnitPreference {
        self.state().unit
    }

    #[must_use]
    pub fn recent_cities(&self) -> Vec<String> {
        self.state().recent_cities.as_slice().to_vec()
    }

    /// Inform the coordinator whether the display is visible. Background
    /// refreshes are suppressed while it is not.
    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    /// Run one refresh cycle.
    ///
    /// Fatal errors surface exactly one error status; a cycle superseded
    /// mid-flight discards its results (and any error) silently.
    pub async fn refresh(&self, locus: Locus, options: RefreshOptions) -> Result<RefreshOutcome> {
        match locus {
            Locus::Device => self.refresh_from_device(options).await,
            Locus::City(city) => self.refresh_resolved(CycleLocus::City(city), options).await,
            Locus::Coordinates { coords, label_hint } => {
                self.refresh_resolved(CycleLocus::Coordinates { coords, label_hint }, options)
                    .await
            }
        }
    }

    /// Restore the last session: stored location, else device position (with
    /// its default-city fallback chain).
    pub async fn initialize(&self) -> Result<RefreshOutcome> {
        let stored = self.load_preferences().await;

        match stored {
            Some(stored) => {
                let label_hint = Some(stored.label.clone()).filter(|label| !label.is_empty());
                self.refresh(
                    Locus::Coordinates {
                        coords: stored.coordinates(),
                        label_hint,
                    },
                    RefreshOptions::with_status("Restoring last location", "Live stream"),
                )
                .await
            }
            None => {
                self.refresh(
                    Locus::Device,
                    RefreshOptions::with_status("Syncing local weather", "Live stream"),
                )
                .await
            }
        }
    }

    /// Switch the display unit, persist it, and re-present the held snapshot.
    /// No network traffic; stored values stay Celsius.
    pub async fn set_unit(&self, unit: UnitPreference) {
        let snapshot = {
            let mut state = self.state();
            if state.unit == unit {
                return;
            }
            state.unit = unit;
            state.snapshot.clone()
        };

        if let Some(prefs) = &self.prefs {
            let _ = prefs.save_unit(unit).await;
        }

        if let Some(snapshot) = snapshot {
            self.sink.present(&snapshot, unit);
        }
    }

    /// One background-refresh opportunity. Suppressed while hidden, while a
    /// cycle is in flight, or before any location is known. Returns whether
    /// a refresh was started.
    pub async fn auto_refresh_tick(&self) -> bool {
        if !self.visible.load(Ordering::SeqCst) {
            return false;
        }
        let target = {
            let state = self.state();
            if state.in_flight > 0 {
                None
            } else {
                state
                    .last_coords
                    .map(|coords| (coords, state.location_label.clone()))
            }
        };
        let Some((coords, label)) = target else {
            return false;
        };

        let label_hint = Some(label).filter(|l| !l.is_empty());
        let _ = self
            .refresh(
                Locus::Coordinates { coords, label_hint },
                RefreshOptions::with_status("Auto refreshing", "Live stream"),
            )
            .await;
        true
    }

    /// Drive periodic background refreshes until the task is dropped.
    pub async fn run_auto_refresh(self: Arc<Self>) {
        let period = Duration::from_secs(self.config.defaults.auto_refresh_minutes * 60);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; the initial refresh is the
        // caller's job.
        interval.tick().await;
        loop {
            interval.tick().await;
            self.auto_refresh_tick().await;
        }
    }

    async fn refresh_from_device(&self, options: RefreshOptions) -> Result<RefreshOutcome> {
        self.sink
            .status(Status::Loading("Detecting your location".to_string()));
        let limit = Duration::from_secs(self.config.defaults.geolocation_timeout_seconds);

        match geolocate::locate_with_timeout(self.geolocator.as_ref(), limit).await {
            Ok(coords) => {
                let label_hint = {
                    let state = self.state();
                    if state.location_label.is_empty() {
                        Some("My Location".to_string())
                    } else {
                        Some(state.location_label.clone())
                    }
                };
                self.refresh_resolved(CycleLocus::Coordinates { coords, label_hint }, options)
                    .await
            }
            Err(geo_error) => {
                warn!("device location unavailable ({geo_error}); trying default city");
                let fallback = RefreshOptions {
                    remember_city: false,
                    ..options
                };
                self.refresh_resolved(
                    CycleLocus::City(self.config.defaults.city.clone()),
                    fallback,
                )
                .await
            }
        }
    }

    async fn refresh_resolved(
        &self,
        locus: CycleLocus,
        options: RefreshOptions,
    ) -> Result<RefreshOutcome> {
        let token = self.next_token();

        {
            self.state().in_flight += 1;
        }
        let result = self.drive_cycle(token, locus, &options).await;
        {
            let mut state = self.state();
            state.in_flight = state.in_flight.saturating_sub(1);
        }

        match result {
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                if self.is_current(token) {
                    warn!("refresh cycle {token} failed: {error}");
                    self.sink.status(Status::Error(error.user_message()));
                    Err(error)
                } else {
                    debug!("superseded cycle {token} failed; discarding: {error}");
                    Ok(RefreshOutcome::Superseded)
                }
            }
        }
    }

    async fn drive_cycle(
        &self,
        token: u64,
        locus: CycleLocus,
        options: &RefreshOptions,
    ) -> Result<RefreshOutcome> {
        let (coords, label_hint, resolved_city) = match locus {
            CycleLocus::City(raw) => {
                let city = normalize_city_text(&raw);
                self.sink
                    .status(Status::Loading("Resolving location".to_string()));
                let place = LocationResolver::forward(self.api.as_ref(), &city).await?;
                (place.coordinates, Some(place.label), Some(place.city_name))
            }
            CycleLocus::Coordinates { coords, label_hint } => {
                let hint = label_hint
                    .map(|label| normalize_city_text(&label))
                    .filter(|label| !label.is_empty());
                (coords, hint, None)
            }
        };

        self.sink
            .status(Status::Loading(options.loading_text.clone()));
        info!("refresh cycle {token} for {}", coords.format());

        // Both fetches run concurrently and both outcomes are observed; a
        // failed air-quality fetch degrades instead of aborting.
        let (forecast_result, air_result) =
            join!(self.api.forecast(coords), self.api.air_quality(coords));

        if !self.is_current(token) {
            debug!("cycle {token} superseded during fetch");
            return Ok(RefreshOutcome::Superseded);
        }

        let forecast = forecast_result?;
        let air = match air_result {
            Ok(payload) => Some(payload),
            Err(error) => {
                warn!("air quality unavailable, continuing without it: {error}");
                None
            }
        };

        let label = match label_hint {
            Some(label) => label,
            None => LocationResolver::reverse(self.api.as_ref(), coords)
                .await
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        };

        if !self.is_current(token) {
            debug!("cycle {token} superseded during reverse geocoding");
            return Ok(RefreshOutcome::Superseded);
        }

        let now = Local::now().naive_local();
        let snapshot = Arc::new(Snapshot::assemble(
            coords,
            label.clone(),
            forecast,
            air,
            now,
            self.config.defaults.hourly_window,
            self.config.defaults.daily_window,
        )?);

        let remember = resolved_city.is_some() && options.remember_city;

        // Final staleness check and commit happen under the same lock, so a
        // newer cycle can never observe a half-written state.
        let (unit, recents) = {
            let mut state = self.state();
            if !self.is_current(token) {
                debug!("cycle {token} superseded before commit");
                return Ok(RefreshOutcome::Superseded);
            }
            state.snapshot = Some(Arc::clone(&snapshot));
            state.last_coords = Some(coords);
            state.location_label = label.clone();
            if remember {
                if let Some(city) = &resolved_city {
                    state.recent_cities.push(city);
                }
            }
            (state.unit, state.recent_cities.clone())
        };

        if let Some(prefs) = &self.prefs {
            let stored = StoredLocation {
                latitude: coords.latitude,
                longitude: coords.longitude,
                label,
            };
            let _ = prefs.save_last_location(&stored).await;
            if remember {
                let _ = prefs.save_recent_cities(recents.as_slice()).await;
            }
        }

        self.sink.present(&snapshot, unit);
        if remember {
            self.sink.recent_cities(recents.as_slice());
        }
        self.sink.status(Status::Ready(options.ready_text.clone()));

        Ok(RefreshOutcome::Committed(snapshot))
    }

    /// Load persisted preferences into shared state. Read failures fall back
    /// to defaults; a stored location with non-finite coordinates is ignored.
    async fn load_preferences(&self) -> Option<StoredLocation> {
        let prefs = self.prefs.as_ref()?;

        let unit = prefs.load_unit().await.unwrap_or_else(|error| {
            warn!("could not read unit preference: {error}");
            None
        });
        let recents = prefs
            .load_recent_cities()
            .await
            .unwrap_or_else(|error| {
                warn!("could not read recent cities: {error}");
                None
            })
            .unwrap_or_default();
        let stored = prefs
            .load_last_location()
            .await
            .unwrap_or_else(|error| {
                warn!("could not read last location: {error}");
                None
            })
            .filter(|loc| loc.latitude.is_finite() && loc.longitude.is_finite());

        let recent_list = {
            let mut state = self.state();
            if let Some(unit) = unit {
                state.unit = unit;
            }
            state.recent_cities =
                RecentCities::from_stored(recents, self.config.defaults.recent_city_limit);
            if let Some(stored) = &stored {
                state.last_coords = Some(stored.coordinates());
                state.location_label = normalize_city_text(&stored.label);
            }
            state.recent_cities.clone()
        };

        self.sink.recent_cities(recent_list.as_slice());
        stored
    }
}
