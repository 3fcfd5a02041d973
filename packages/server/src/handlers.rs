//! HTTP handler functions for the `SeniAURA` API.

use actix_web::{HttpResponse, web};
use seniaura_analytics::AnalyticsError;
use seniaura_analytics_models::{
    ClusterParams, FilterSpec, GapParams, RadarParams, ScreeningParams, VariableOption,
};
use seniaura_catalogue_models::{Category, VariableEntry};
use seniaura_server_models::{
    ApiCatalogueLookups, ApiError, ApiHealth, ApiTerritoryDetail, ApiTerritorySummary,
    VariablesQuery,
};
use seniaura_territory_models::Territory;

use crate::AppState;
use crate::geometry::{boundaries_to_geojson, territories_to_geojson};

fn unprocessable(e: &AnalyticsError) -> HttpResponse {
    log::debug!("Rejected analytical request: {e}");
    HttpResponse::UnprocessableEntity().json(ApiError::new(e.user_message()))
}

fn not_found(message: String) -> HttpResponse {
    HttpResponse::NotFound().json(ApiError::new(message))
}

fn centroid(territory: &Territory) -> Option<[f64; 2]> {
    territory.centroid().map(|(lon, lat)| [lon, lat])
}

fn option(entry: &VariableEntry) -> VariableOption {
    VariableOption {
        value: entry.code.clone(),
        label: entry.label.clone(),
    }
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        territories: state.dataset.territories.len(),
        variables: state.dataset.territories.columns().len(),
    })
}

/// `GET /api/catalogue`
///
/// Returns every catalogue entry, sorted by code.
pub async fn catalogue(state: web::Data<AppState>) -> HttpResponse {
    let entries: Vec<&VariableEntry> = state.dataset.catalogue.iter().collect();
    HttpResponse::Ok().json(entries)
}

/// `GET /api/catalogue/lookups`
pub async fn catalogue_lookups(state: web::Data<AppState>) -> HttpResponse {
    let catalogue = &state.dataset.catalogue;
    let owned = |code: &str| code.to_string();
    HttpResponse::Ok().json(ApiCatalogueLookups {
        labels: catalogue
            .labels()
            .into_iter()
            .map(|(code, label)| (owned(code), label.to_string()))
            .collect(),
        categories: catalogue
            .categories()
            .into_iter()
            .map(|(code, category)| (owned(code), category))
            .collect(),
        polarities: catalogue
            .polarities()
            .into_iter()
            .map(|(code, polarity)| (owned(code), polarity))
            .collect(),
    })
}

/// `GET /api/variables?category=`
///
/// Returns the selection options of one category, or of every selectable
/// category when none is given.
pub async fn variables(
    state: web::Data<AppState>,
    query: web::Query<VariablesQuery>,
) -> HttpResponse {
    let dataset = &state.dataset;
    let options: Vec<VariableOption> = match query.category {
        Some(category) => dataset
            .selection_options(category)
            .into_iter()
            .map(option)
            .collect(),
        None => Category::all()
            .iter()
            .filter(|c| c.is_selectable())
            .flat_map(|c| dataset.selection_options(*c))
            .map(option)
            .collect(),
    };
    HttpResponse::Ok().json(options)
}

/// `GET /api/territories`
pub async fn territories(state: web::Data<AppState>) -> HttpResponse {
    let list: Vec<ApiTerritorySummary> = state
        .dataset
        .territories
        .iter()
        .map(|t| ApiTerritorySummary {
            code: t.code.clone(),
            name: t.display_name().to_string(),
            centroid: centroid(t),
        })
        .collect();
    HttpResponse::Ok().json(list)
}

/// `GET /api/territories/{code}`
pub async fn territory(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let code = path.into_inner();
    match state.dataset.territories.get(&code) {
        Some(t) => HttpResponse::Ok().json(ApiTerritoryDetail {
            code: t.code.clone(),
            name: t.display_name().to_string(),
            centroid: centroid(t),
            values: t.values.clone(),
            attributes: t.attributes.clone(),
        }),
        None => not_found(format!("Unknown territory '{code}'")),
    }
}

/// `GET /api/boundaries`
///
/// Territory boundaries as a `GeoJSON` `FeatureCollection`.
pub async fn boundaries(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(territories_to_geojson(state.dataset.territories.iter()))
}

/// `GET /api/overlay`
pub async fn overlay(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(boundaries_to_geojson(&state.dataset.overlay))
}

/// `GET /api/ranges/{variable}`
///
/// Slider bounds for one variable.
pub async fn range(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let variable = path.into_inner();
    let dataset = &state.dataset;
    match seniaura_analytics::variable_range(&dataset.territories, &dataset.catalogue, &variable) {
        Some(range) => HttpResponse::Ok().json(range),
        None => not_found(format!("No values for variable '{variable}'")),
    }
}

/// `POST /api/filter`
pub async fn filter(state: web::Data<AppState>, body: web::Json<Vec<FilterSpec>>) -> HttpResponse {
    let evaluation = seniaura_analytics::evaluate_filters(&state.dataset.territories, &body);
    HttpResponse::Ok().json(evaluation)
}

/// `POST /api/gap`
pub async fn gap(state: web::Data<AppState>, body: web::Json<GapParams>) -> HttpResponse {
    let dataset = &state.dataset;
    let ranking = seniaura_analytics::rank_gaps(&dataset.territories, &dataset.catalogue, &body);
    HttpResponse::Ok().json(ranking)
}

/// `POST /api/radar`
pub async fn radar(state: web::Data<AppState>, body: web::Json<RadarParams>) -> HttpResponse {
    let dataset = &state.dataset;
    match seniaura_analytics::radar_profile(&dataset.territories, &dataset.catalogue, &body) {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => unprocessable(&e),
    }
}

/// `POST /api/cluster`
///
/// K-Means runs on the blocking thread pool.
pub async fn cluster(state: web::Data<AppState>, body: web::Json<ClusterParams>) -> HttpResponse {
    let dataset = state.dataset.clone();
    let params = body.into_inner();

    let result = web::block(move || {
        seniaura_analytics::cluster(&dataset.territories, &dataset.catalogue, &params)
    })
    .await;

    match result {
        Ok(Ok(clusters)) => HttpResponse::Ok().json(clusters),
        Ok(Err(e)) => unprocessable(&e),
        Err(e) => {
            log::error!("Clustering task failed: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Clustering failed"))
        }
    }
}

/// `POST /api/screening`
pub async fn screening(
    state: web::Data<AppState>,
    body: web::Json<ScreeningParams>,
) -> HttpResponse {
    let results = seniaura_analytics::screen(
        &state.dataset.territories,
        &body.outcomes,
        &body.determinants,
    );
    HttpResponse::Ok().json(results)
}
