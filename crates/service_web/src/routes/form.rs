//! HTML pricing form.
//!
//! `GET /` renders the parameter form; `POST /` runs the Monte Carlo
//! engine on the submitted values and re-renders the form with the
//! estimate (as `price ± 1.96·SE`) or a readable error banner. Empty
//! fields fall back to their defaults, mirroring the placeholders.

use axum::extract::Form;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::str::FromStr;
use tracing::info;

use super::AppState;
use crate::pricing::{self, PayoffMode, PricingInputs, PricingOutcome};

/// Raw form fields as submitted; everything arrives as text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PricingForm {
    spot: String,
    strike: String,
    maturity: String,
    rate: String,
    volatility: String,
    steps: String,
    paths: String,
    seed: String,
    payoff_mode: String,
    custom_expr: String,
}

/// Build the form routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(show_form).post(submit_form))
}

/// GET / - the empty pricing form.
async fn show_form() -> Html<String> {
    Html(render_page(&PricingForm::default(), None, None))
}

/// POST / - price with the submitted parameters and re-render.
async fn submit_form(Form(form): Form<PricingForm>) -> Html<String> {
    let inputs = match to_inputs(&form) {
        Ok(inputs) => inputs,
        Err(message) => return Html(render_page(&form, None, Some(&message))),
    };

    info!(paths = inputs.paths, steps = inputs.steps, "form pricing request");

    // The estimation is CPU-bound; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || pricing::estimate(&inputs)).await;

    match outcome {
        Ok(Ok(outcome)) => Html(render_page(&form, Some(&outcome), None)),
        Ok(Err(failure)) => Html(render_page(&form, None, Some(&failure.to_string()))),
        Err(join_error) => Html(render_page(
            &form,
            None,
            Some(&format!("pricing task failed: {}", join_error)),
        )),
    }
}

/// Parses one field, falling back to its default when left empty.
fn parse_field<T: FromStr>(name: &str, raw: &str, default: T) -> Result<T, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed
        .parse()
        .map_err(|_| format!("Invalid value for {}: '{}'", name, trimmed))
}

fn to_inputs(form: &PricingForm) -> Result<PricingInputs, String> {
    let payoff_mode = match form.payoff_mode.trim() {
        "" | "call" => PayoffMode::Call,
        "put" => PayoffMode::Put,
        "custom" => PayoffMode::Custom,
        other => return Err(format!("Unknown payoff mode '{}'", other)),
    };

    let seed = {
        let trimmed = form.seed.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(
                trimmed
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid value for seed: '{}'", trimmed))?,
            )
        }
    };

    let custom_expr = {
        let trimmed = form.custom_expr.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    };

    Ok(PricingInputs {
        spot: parse_field("spot", &form.spot, 100.0)?,
        strike: parse_field("strike", &form.strike, 100.0)?,
        maturity: parse_field("maturity", &form.maturity, 1.0)?,
        rate: parse_field("rate", &form.rate, 0.05)?,
        volatility: parse_field("volatility", &form.volatility, 0.2)?,
        steps: parse_field("steps", &form.steps, 252)?,
        paths: parse_field("paths", &form.paths, 20_000)?,
        seed,
        payoff_mode,
        custom_expr,
    })
}

/// Escapes text for safe interpolation into HTML.
fn html_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn selected(current: &str, option: &str) -> &'static str {
    let normalised = if current.trim().is_empty() {
        "call"
    } else {
        current.trim()
    };
    if normalised == option {
        " selected"
    } else {
        ""
    }
}

fn render_page(form: &PricingForm, outcome: Option<&PricingOutcome>, error: Option<&str>) -> String {
    let banner = if let Some(outcome) = outcome {
        format!(
            "<div class=\"result\">Estimated price: <strong>{:.4} &plusmn; {:.4}</strong> (95% CI) &middot; seed {}</div>",
            outcome.result.price,
            outcome.result.confidence_95(),
            outcome.seed
        )
    } else if let Some(message) = error {
        format!("<div class=\"error\">{}</div>", html_escape(message))
    } else {
        String::new()
    };

    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Monte Carlo Option Pricer</title>
    <style>
      body {{ font-family: Arial, sans-serif; margin: 2rem auto; max-width: 960px; line-height: 1.5; }}
      form {{ background: #f8f9fa; padding: 1rem 1.5rem; border-radius: 8px; border: 1px solid #e1e5ea; }}
      label {{ display: block; margin-top: 0.4rem; font-weight: 600; }}
      input, select, textarea {{ width: 100%; padding: 0.5rem; font-size: 1rem; margin-top: 0.2rem; box-sizing: border-box; }}
      .two-col {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; }}
      button {{ margin-top: 1rem; padding: 0.6rem 1rem; font-size: 1rem; cursor: pointer; }}
      .result {{ margin-top: 1.5rem; padding: 1rem; background: #e8f5e9; border: 1px solid #c8e6c9; border-radius: 6px; }}
      .error {{ margin-top: 1.5rem; padding: 1rem; background: #fdecea; border: 1px solid #f5c2c7; border-radius: 6px; color: #8a1c1c; }}
    </style>
  </head>
  <body>
    <header>
      <h1>Monte Carlo Option Pricer</h1>
      <p>Simulate option payoffs over geometric Brownian motion paths.</p>
    </header>

    <form method="post" action="/">
      <div class="two-col">
        <div>
          <label for="spot">Spot</label>
          <input id="spot" name="spot" value="{spot}" placeholder="100.0">
          <label for="strike">Strike</label>
          <input id="strike" name="strike" value="{strike}" placeholder="100.0">
          <label for="maturity">Maturity (years)</label>
          <input id="maturity" name="maturity" value="{maturity}" placeholder="1.0">
          <label for="rate">Risk-free rate</label>
          <input id="rate" name="rate" value="{rate}" placeholder="0.05">
          <label for="volatility">Volatility</label>
          <input id="volatility" name="volatility" value="{volatility}" placeholder="0.2">
        </div>
        <div>
          <label for="steps">Time steps per path</label>
          <input id="steps" name="steps" value="{steps}" placeholder="252">
          <label for="paths">Number of paths</label>
          <input id="paths" name="paths" value="{paths}" placeholder="20000">
          <label for="seed">Seed (optional)</label>
          <input id="seed" name="seed" value="{seed}" placeholder="random">
          <label for="payoff_mode">Payoff</label>
          <select id="payoff_mode" name="payoff_mode">
            <option value="call"{call_selected}>Vanilla call</option>
            <option value="put"{put_selected}>Vanilla put</option>
            <option value="custom"{custom_selected}>Custom formula</option>
          </select>
          <label for="custom_expr">Custom formula</label>
          <textarea id="custom_expr" name="custom_expr" placeholder="max(mean(path) - 100, 0)">{custom_expr}</textarea>
        </div>
      </div>
      <button type="submit">Price</button>
    </form>
    {banner}
  </body>
</html>
"#,
        spot = html_escape(&form.spot),
        strike = html_escape(&form.strike),
        maturity = html_escape(&form.maturity),
        rate = html_escape(&form.rate),
        volatility = html_escape(&form.volatility),
        steps = html_escape(&form.steps),
        paths = html_escape(&form.paths),
        seed = html_escape(&form.seed),
        custom_expr = html_escape(&form.custom_expr),
        call_selected = selected(&form.payoff_mode, "call"),
        put_selected = selected(&form.payoff_mode, "put"),
        custom_selected = selected(&form.payoff_mode, "custom"),
        banner = banner,
    )
}
