// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! Interactive shell hosting the role views.
//!
//! Presentation only: every session decision is delegated to the library
//! (`SessionGuard`, `routes::resolve`, `ApiClient`). Dashboards render as
//! plain text.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use opd_client::api::ApiClient;
use opd_client::auth::{Role, SessionGuard, TokenStore};
use opd_client::models::{LoginRequest, Prediction, PredictionRequest, RegisterRequest};
use opd_client::routes::{self, Navigator, Route};

/// Navigation signal shared between the transport layer and the loop.
///
/// The client fires it on a 401; the loop drains it after every command and
/// lands back on the entry screen.
pub struct EntryRedirect {
    requested: AtomicBool,
}

impl EntryRedirect {
    pub fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}

impl Navigator for EntryRedirect {
    fn redirect_to_entry(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }
}

pub async fn run(
    client: ApiClient,
    guard: SessionGuard,
    store: Arc<dyn TokenStore>,
    redirect: Arc<EntryRedirect>,
) {
    println!("OPD Predict client. Type 'help' for commands.");

    // A durable session from a previous run resumes on its dashboard.
    let mut route = match guard.current_claims() {
        Some(claims) if guard.is_authenticated() => Route::home_for(claims.role()),
        _ => Route::Entry,
    };
    render(route, &guard, &client).await;

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        input.clear();
        print!("> ");
        let _ = io::stdout().flush();
        if stdin.read_line(&mut input).is_err() || input.is_empty() {
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "help" => help(),
            "quit" | "exit" => break,
            "login" => {
                if let Some(home) = do_login(&client, &store, &guard).await {
                    route = home;
                    render(route, &guard, &client).await;
                }
            }
            "register" => {
                if let Some(home) = do_register(&client, &store, &guard).await {
                    route = home;
                    render(route, &guard, &client).await;
                }
            }
            "logout" => {
                if let Err(e) = store.remove() {
                    eprintln!("failed to clear session: {e}");
                }
                route = Route::Entry;
                println!("Logged out.");
            }
            "whoami" => whoami(&guard),
            "predict" => do_predict(&client, &guard).await,
            "health" => match client.health().await {
                Ok(health) => println!("{}: {}", health.service, health.status),
                Err(e) => eprintln!("health check failed: {e}"),
            },
            _ if line.starts_with("open ") => {
                match parse_route(line.trim_start_matches("open ").trim()) {
                    Some(requested) => {
                        route = routes::resolve(requested, &guard);
                        if route == Route::Entry && requested != Route::Entry {
                            println!("Access denied; returning to the login screen.");
                        }
                        render(route, &guard, &client).await;
                    }
                    None => println!("Unknown view. Try 'open patient|doctor|admin'."),
                }
            }
            _ => println!("Unknown command '{line}'. Type 'help' for commands."),
        }

        // A 401 during any of the above already tore the session down.
        if redirect.take() {
            route = Route::Entry;
            println!("Your session is no longer valid. Please log in again.");
        }
    }
}

fn help() {
    println!(
        "Commands:\n  \
         login                 sign in with email and password\n  \
         register              create an account\n  \
         logout                end the session\n  \
         whoami                show the signed-in identity\n  \
         open <view>           navigate: patient, doctor or admin\n  \
         predict               request an OPD load prediction\n  \
         health                check the prediction service\n  \
         quit | exit           leave"
    );
}

fn parse_route(name: &str) -> Option<Route> {
    match name {
        "patient" => Some(Route::PatientDashboard),
        "doctor" => Some(Route::DoctorDashboard),
        "admin" => Some(Route::AdminDashboard),
        _ => None,
    }
}

async fn render(route: Route, guard: &SessionGuard, client: &ApiClient) {
    match route {
        Route::Entry => println!("Please 'login' or 'register' to continue."),
        Route::PatientDashboard => patient_view(guard),
        Route::DoctorDashboard => doctor_view(guard, client).await,
        Route::AdminDashboard => admin_view(guard, client).await,
    }
}

fn view_header(title: &str, guard: &SessionGuard) {
    println!("--- {title} ---");
    if let Some(claims) = guard.current_claims() {
        println!("Welcome back, {}", claims.display_name());
    }
}

fn patient_view(guard: &SessionGuard) {
    view_header("Patient Portal", guard);
    println!("Run 'predict' to get an OPD load prediction for your visit.");
}

async fn doctor_view(guard: &SessionGuard, client: &ApiClient) {
    view_header("Doctor Dashboard", guard);
    match client.doctor_analytics().await {
        Ok(analytics) => {
            println!("OPD risk level:       {}", analytics.opd_risk_level);
            println!("Patients today:       {}", analytics.patients_today);
            println!("High-risk cases:      {}", analytics.high_risk_cases);
            println!("Most common symptom:  {}", analytics.most_common_symptom);
            println!("Departments:");
            for row in &analytics.department_distribution {
                println!("  {:20} {}", row.name, row.value);
            }
            println!("Risk distribution:");
            for row in &analytics.risk_distribution {
                println!("  {:20} {}", row.name, row.value);
            }
            println!("Hourly load:");
            for row in &analytics.hourly_load {
                println!("  {:8} {} patients", row.hour, row.patients);
            }
        }
        Err(e) => eprintln!("failed to load analytics: {e}"),
    }
}

async fn admin_view(guard: &SessionGuard, client: &ApiClient) {
    view_header("Admin Panel", guard);
    match client.admin_analytics().await {
        Ok(analytics) => {
            println!("Patients today:       {}", analytics.total_patients_today);
            println!("High-risk periods:    {}", analytics.high_risk_periods);
            println!("Peak OPD time:        {}", analytics.peak_opd_time);
            println!("System status:        {}", analytics.system_status);
            println!(
                "Prediction accuracy:  {:.0}%",
                analytics.prediction_accuracy * 100.0
            );
            println!("Weekly trend:");
            for row in &analytics.weekly_trends {
                println!("  {:4} {} patients", row.day, row.patients);
            }
            println!("{}", analytics.ai_summary);
        }
        Err(e) => eprintln!("failed to load analytics: {e}"),
    }
}

fn whoami(guard: &SessionGuard) {
    match guard.current_claims() {
        Some(claims) => {
            println!("{} <{}>", claims.display_name(), claims.email);
            println!("role: {}", claims.role());
            match claims.exp.and_then(|exp| chrono::DateTime::from_timestamp(exp, 0)) {
                Some(expiry) => println!("session expires: {expiry}"),
                None => println!("session expires: unknown"),
            }
            if !guard.is_authenticated() {
                println!("(session expired)");
            }
        }
        None => println!("Not signed in."),
    }
}

async fn do_login(
    client: &ApiClient,
    store: &Arc<dyn TokenStore>,
    guard: &SessionGuard,
) -> Option<Route> {
    let email = prompt("email")?;
    let password = prompt("password")?;
    let response = match client.login(&LoginRequest { email, password }).await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("login failed: {e}");
            return None;
        }
    };
    save_session(store, &response.token);
    println!("{}", response.message);
    Some(home_route(guard))
}

async fn do_register(
    client: &ApiClient,
    store: &Arc<dyn TokenStore>,
    guard: &SessionGuard,
) -> Option<Route> {
    let name = prompt("name")?;
    let email = prompt("email")?;
    let password = prompt("password")?;
    let role = prompt("role [patient]").map_or(Role::Patient, |v| Role::from_claim(&v));
    let response = match client
        .register(&RegisterRequest {
            name,
            email,
            password,
            role,
        })
        .await
    {
        Ok(response) => response,
        Err(e) => {
            eprintln!("registration failed: {e}");
            return None;
        }
    };
    save_session(store, &response.token);
    println!("{}", response.message);
    Some(home_route(guard))
}

fn save_session(store: &Arc<dyn TokenStore>, token: &str) {
    if let Err(e) = store.save(token) {
        eprintln!("failed to persist session: {e}");
    }
}

fn home_route(guard: &SessionGuard) -> Route {
    let role = guard
        .current_claims()
        .map(|claims| claims.role())
        .unwrap_or(Role::Unrecognized);
    Route::home_for(role)
}

async fn do_predict(client: &ApiClient, guard: &SessionGuard) {
    // The prediction form lives on the patient dashboard.
    if routes::resolve(Route::PatientDashboard, guard) == Route::Entry {
        println!("Access denied; 'predict' is available to signed-in patients.");
        return;
    }
    let Some(age) = prompt("age").and_then(|v| v.parse::<u32>().ok()) else {
        println!("A numeric age is required.");
        return;
    };
    let Some(department) = prompt("department") else {
        println!("A department is required.");
        return;
    };
    let Some(symptoms) = prompt("symptoms") else {
        println!("Symptoms are required.");
        return;
    };
    let input = PredictionRequest {
        age,
        department,
        symptoms,
        user_lat: None,
        user_lng: None,
    };
    match client.predict_opd(&input).await {
        Ok(prediction) => print_prediction(&prediction),
        Err(e) => eprintln!("prediction failed: {e}"),
    }
}

fn print_prediction(prediction: &Prediction) {
    println!("Risk level:          {}", prediction.risk_level);
    println!("Predicted load:      {}/100", prediction.predicted_load);
    println!(
        "Confidence:          {:.0}%",
        prediction.congestion_confidence * 100.0
    );
    println!("Best visiting time:  {}", prediction.best_visiting_time);
    println!("Recommendation:      {}", prediction.recommendation);
    if let Some(hospitals) = &prediction.nearby_hospitals {
        println!("Nearby hospitals:");
        for hospital in hospitals {
            let tag = if hospital.ai_recommended { " [recommended]" } else { "" };
            println!(
                "  {} ({}, wait {}, rated {:.1}){}",
                hospital.name, hospital.distance, hospital.estimated_wait, hospital.rating, tag
            );
        }
    }
}

fn prompt(label: &str) -> Option<String> {
    print!("{label}: ");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok()?;
    let value = line.trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
