use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::core::{
    Assumptions, CalculatorInputs, CalculatorResult, DashboardReport, FinancialSnapshot,
    FireError, Horizon, ProjectionPoint, build_dashboard, run_calculator,
};
use crate::presentation::{Currency, render_recommendations};
use crate::store::{JsonStore, SnapshotPatch, StoreError, UserDocument};

#[derive(Parser, Debug)]
#[command(
    name = "fire-moni",
    about = "FIRE projections: net worth, savings rate and the path to financial independence"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Serve the JSON API")]
    Serve(ServeArgs),
    #[command(about = "Run the quick calculator once and print the result as JSON")]
    Calculate(CalculatorCli),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "FIRE_MONI_PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(
        long,
        env = "FIRE_MONI_DATA_DIR",
        default_value = "data",
        help = "Directory holding one JSON document per user"
    )]
    pub data_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct CalculatorCli {
    #[arg(long, default_value_t = 30)]
    current_age: u32,
    #[arg(long, default_value_t = 55)]
    target_retirement_age: u32,
    #[arg(
        long,
        default_value_t = 2_400_000.0,
        help = "Expected annual spending in retirement"
    )]
    annual_expenses: f64,
    #[arg(long, default_value_t = 5_000_000.0)]
    current_investments: f64,
    #[arg(long, default_value_t = 1_200_000.0)]
    annual_savings: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Annual withdrawal rate in retirement in percent (2-10)"
    )]
    withdrawal_rate: f64,
    #[arg(
        long,
        default_value_t = 8.0,
        help = "Expected annual investment return in percent (1-20)"
    )]
    expected_return: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatorPayload {
    current_age: Option<u32>,
    target_retirement_age: Option<u32>,
    annual_expenses: Option<f64>,
    current_investments: Option<f64>,
    annual_savings: Option<f64>,
    withdrawal_rate: Option<f64>,
    expected_return: Option<f64>,
}

// Percentages, as entered by the user.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AssumptionsPayload {
    annual_return: Option<f64>,
    inflation: Option<f64>,
    escalate_contributions: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DashboardPayload {
    financial_data: FinancialSnapshot,
    assumptions: Option<AssumptionsPayload>,
    currency: Option<Currency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrencyPayload {
    currency: Currency,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirstLoginPayload {
    is_first_login: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProfilePayload {
    email: String,
    first_name: String,
    last_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardResponse {
    currency: Currency,
    report: DashboardReport,
    recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculatorResponse {
    fire_number: f64,
    reachable: bool,
    years_to_fire: Option<u32>,
    actual_retirement_age: Option<u32>,
    required_annual_savings: f64,
    retirement_horizon_elapsed: bool,
    on_track: bool,
    gap_years: Option<i64>,
    message: Option<String>,
    projection: Vec<ProjectionPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedCalculatorResponse {
    financial_data: FinancialSnapshot,
    calculator: CalculatorResponse,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone)]
struct AppState {
    store: Arc<JsonStore>,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => run_http_server(args.port, args.data_dir).await,
        Command::Calculate(args) => {
            let inputs = build_calculator_inputs(args).map_err(anyhow::Error::msg)?;
            let result = run_calculator(&inputs)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&calculator_response(&result))?
            );
            Ok(())
        }
    }
}

pub async fn run_http_server(port: u16, data_dir: PathBuf) -> anyhow::Result<()> {
    let store = JsonStore::open(data_dir)?;
    log::info!("user documents stored in {}", store.root().display());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("FIRE API listening on http://{addr}");

    axum::serve(listener, router(Arc::new(store))).await?;
    Ok(())
}

pub fn router(store: Arc<JsonStore>) -> Router {
    Router::new()
        .route("/api/dashboard", post(dashboard_handler))
        .route(
            "/api/calculator",
            get(calculator_get_handler).post(calculator_post_handler),
        )
        .route("/api/users/:id", get(user_handler))
        .route("/api/users/:id/profile", post(create_profile_handler))
        .route(
            "/api/users/:id/financial-data",
            put(replace_financial_data_handler).patch(patch_financial_data_handler),
        )
        .route("/api/users/:id/dashboard", get(user_dashboard_handler))
        .route("/api/users/:id/calculator/save", post(save_calculator_handler))
        .route("/api/users/:id/currency", put(currency_handler))
        .route("/api/users/:id/first-login", post(first_login_handler))
        .fallback(not_found_handler)
        .with_state(AppState { store })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn dashboard_handler(Json(payload): Json<DashboardPayload>) -> Response {
    let assumptions = match assumptions_from_payload(payload.assumptions.unwrap_or_default()) {
        Ok(assumptions) => assumptions,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    dashboard_response(
        &payload.financial_data,
        &assumptions,
        payload.currency.unwrap_or_default(),
    )
}

async fn calculator_get_handler(Query(payload): Query<CalculatorPayload>) -> Response {
    calculator_handler_impl(payload)
}

async fn calculator_post_handler(Json(payload): Json<CalculatorPayload>) -> Response {
    calculator_handler_impl(payload)
}

fn calculator_handler_impl(payload: CalculatorPayload) -> Response {
    let inputs = match calculator_inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    match run_calculator(&inputs) {
        Ok(result) => json_response(StatusCode::OK, calculator_response(&result)),
        Err(e) => fire_error_response(e),
    }
}

async fn user_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match with_store(&state, move |store| store.load_or_create(&id)).await {
        Ok(doc) => json_response(StatusCode::OK, doc),
        Err(response) => response,
    }
}

async fn create_profile_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProfilePayload>,
) -> Response {
    let created = with_store(&state, move |store| {
        store.create_user_profile(
            &id,
            &payload.email,
            &payload.first_name,
            &payload.last_name,
        )
    })
    .await;
    match created {
        Ok(doc) => json_response(StatusCode::CREATED, doc),
        Err(response) => response,
    }
}

async fn replace_financial_data_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(snapshot): Json<FinancialSnapshot>,
) -> Response {
    match with_store(&state, move |store| store.save_financial_data(&id, &snapshot)).await {
        Ok(()) => json_response(StatusCode::OK, snapshot),
        Err(response) => response,
    }
}

async fn patch_financial_data_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<SnapshotPatch>,
) -> Response {
    match with_store(&state, move |store| store.update_financial_data(&id, &patch)).await {
        Ok(snapshot) => json_response(StatusCode::OK, snapshot),
        Err(response) => response,
    }
}

async fn user_dashboard_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(payload): Query<AssumptionsPayload>,
) -> Response {
    let assumptions = match assumptions_from_payload(payload) {
        Ok(assumptions) => assumptions,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let doc: UserDocument =
        match with_store(&state, move |store| store.load_or_create(&id)).await {
            Ok(doc) => doc,
            Err(response) => return response,
        };
    dashboard_response(&doc.financial_data, &assumptions, doc.currency)
}

async fn save_calculator_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CalculatorPayload>,
) -> Response {
    let inputs = match calculator_inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let result = match run_calculator(&inputs) {
        Ok(result) => result,
        Err(e) => return fire_error_response(e),
    };
    let patch = SnapshotPatch::from_calculator(&inputs);
    match with_store(&state, move |store| store.update_financial_data(&id, &patch)).await {
        Ok(financial_data) => json_response(
            StatusCode::OK,
            SavedCalculatorResponse {
                financial_data,
                calculator: calculator_response(&result),
            },
        ),
        Err(response) => response,
    }
}

async fn currency_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CurrencyPayload>,
) -> Response {
    let currency = payload.currency;
    match with_store(&state, move |store| store.set_currency(&id, currency)).await {
        Ok(()) => json_response(StatusCode::OK, currency),
        Err(response) => response,
    }
}

async fn first_login_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<FirstLoginPayload>,
) -> Response {
    let is_first_login = payload.is_first_login;
    match with_store(&state, move |store| store.set_first_login(&id, is_first_login)).await {
        Ok(()) => json_response(StatusCode::NO_CONTENT, ()),
        Err(response) => response,
    }
}

async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, Response>
where
    F: FnOnce(&JsonStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    match tokio::task::spawn_blocking(move || op(&store)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(store_error_response(e)),
        Err(e) => {
            log::error!("store task failed: {e}");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage error",
            ))
        }
    }
}

fn dashboard_response(
    snapshot: &FinancialSnapshot,
    assumptions: &Assumptions,
    currency: Currency,
) -> Response {
    match build_dashboard(snapshot, assumptions) {
        Ok(report) => {
            let recommendations = render_recommendations(&report.recommendations, currency);
            json_response(
                StatusCode::OK,
                DashboardResponse {
                    currency,
                    report,
                    recommendations,
                },
            )
        }
        Err(e) => fire_error_response(e),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = if status == StatusCode::NO_CONTENT {
        status.into_response()
    } else {
        (status, Json(body)).into_response()
    };
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    if status.is_client_error() {
        log::warn!("rejected request ({status}): {msg}");
    }
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn fire_error_response(e: FireError) -> Response {
    let status = match e {
        FireError::ZeroWithdrawalRate => StatusCode::UNPROCESSABLE_ENTITY,
        FireError::Validation(_) => StatusCode::BAD_REQUEST,
    };
    error_response(status, &e.to_string())
}

fn store_error_response(e: StoreError) -> Response {
    match e {
        StoreError::InvalidUserId(_) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        StoreError::Rejected(inner) => fire_error_response(inner),
        StoreError::Io { .. } | StoreError::Json { .. } | StoreError::Poisoned => {
            log::error!("store failure: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Storage error")
        }
    }
}

fn build_calculator_inputs(cli: CalculatorCli) -> Result<CalculatorInputs, String> {
    let inputs = CalculatorInputs {
        current_age: cli.current_age,
        target_retirement_age: cli.target_retirement_age,
        annual_expenses: cli.annual_expenses,
        current_investments: cli.current_investments,
        annual_savings: cli.annual_savings,
        withdrawal_rate: cli.withdrawal_rate,
        expected_return: cli.expected_return,
    };
    inputs.validate().map_err(|e| e.to_string())?;
    Ok(inputs)
}

fn default_calculator_cli() -> CalculatorCli {
    let defaults = CalculatorInputs::default();
    CalculatorCli {
        current_age: defaults.current_age,
        target_retirement_age: defaults.target_retirement_age,
        annual_expenses: defaults.annual_expenses,
        current_investments: defaults.current_investments,
        annual_savings: defaults.annual_savings,
        withdrawal_rate: defaults.withdrawal_rate,
        expected_return: defaults.expected_return,
    }
}

fn calculator_inputs_from_payload(payload: CalculatorPayload) -> Result<CalculatorInputs, String> {
    let mut cli = default_calculator_cli();

    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.target_retirement_age {
        cli.target_retirement_age = v;
    }
    if let Some(v) = payload.annual_expenses {
        cli.annual_expenses = v;
    }
    if let Some(v) = payload.current_investments {
        cli.current_investments = v;
    }
    if let Some(v) = payload.annual_savings {
        cli.annual_savings = v;
    }
    if let Some(v) = payload.withdrawal_rate {
        cli.withdrawal_rate = v;
    }
    if let Some(v) = payload.expected_return {
        cli.expected_return = v;
    }

    build_calculator_inputs(cli)
}

fn assumptions_from_payload(payload: AssumptionsPayload) -> Result<Assumptions, String> {
    let defaults = Assumptions::default();
    let annual_return = payload
        .annual_return
        .unwrap_or(defaults.annual_return_rate * 100.0);
    let inflation = payload.inflation.unwrap_or(defaults.inflation_rate * 100.0);

    if !annual_return.is_finite() || annual_return <= -100.0 || annual_return > 100.0 {
        return Err("annualReturn must be > -100 and <= 100".to_string());
    }
    if !inflation.is_finite() || inflation <= -100.0 || inflation > 100.0 {
        return Err("inflation must be > -100 and <= 100".to_string());
    }

    Ok(Assumptions {
        annual_return_rate: annual_return / 100.0,
        inflation_rate: inflation / 100.0,
        escalate_contributions: payload
            .escalate_contributions
            .unwrap_or(defaults.escalate_contributions),
    })
}

fn calculator_response(result: &CalculatorResult) -> CalculatorResponse {
    let years_to_fire = result.years_to_fire.years();
    CalculatorResponse {
        fire_number: result.fire_number,
        reachable: years_to_fire.is_some(),
        years_to_fire,
        actual_retirement_age: result.actual_retirement_age,
        required_annual_savings: result.required_annual_savings,
        retirement_horizon_elapsed: result.retirement_horizon == Horizon::Elapsed,
        on_track: result.on_track,
        gap_years: result.gap_years,
        message: years_to_fire
            .is_none()
            .then(|| "Cannot reach your FIRE number under current assumptions.".to_string()),
        projection: result.projection.clone(),
    }
}
