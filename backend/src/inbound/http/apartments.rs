//! Apartment catalogue handlers.
//!
//! ```text
//! GET    /api/v1/apartments?bedrooms=1&minPrice=10000&maxPrice=20000
//! GET    /api/v1/apartments/{id}
//! GET    /api/v1/apartments/{id}/availability?checkIn=2024-12-20&checkOut=2024-12-27
//! POST   /api/v1/apartments
//! PATCH  /api/v1/apartments/{id}
//! DELETE /api/v1/apartments/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Apartment, ApartmentDraft, ApartmentFilter, ApartmentId, ApartmentPatch, Availability,
    Bedrooms, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ApartmentSchema, AvailabilitySchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require};

/// Catalogue filter. All parameters are optional.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ApartmentListQuery {
    /// 1 or 2.
    pub bedrooms: Option<u8>,
    /// Inclusive lower bound on the nightly price.
    pub min_price: Option<u64>,
    /// Inclusive upper bound on the nightly price.
    pub max_price: Option<u64>,
}

/// Date range queried by the availability endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    #[param(value_type = String, example = "2024-12-20")]
    pub check_in: Option<NaiveDate>,
    #[param(value_type = String, example = "2024-12-27")]
    pub check_out: Option<NaiveDate>,
}

/// New listing. `images` are URLs; the first becomes the main image.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApartmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = 1)]
    pub bedrooms: Option<u8>,
    pub bathrooms: Option<u8>,
    pub max_guests: Option<u32>,
    #[schema(example = 15000)]
    pub price_per_night: Option<u64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub square_meters: Option<u32>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub is_available: Option<bool>,
}

/// Listing edit. Omitted fields stay as they are; images cannot be edited.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApartmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub bedrooms: Option<u8>,
    pub bathrooms: Option<u8>,
    pub max_guests: Option<u32>,
    pub price_per_night: Option<u64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub square_meters: Option<u32>,
    pub amenities: Option<Vec<String>>,
    pub is_available: Option<bool>,
}

fn parse_bedrooms(raw: Option<u8>) -> Result<Option<Bedrooms>, Error> {
    Ok(raw.map(Bedrooms::try_from).transpose()?)
}

fn parse_apartment_id(raw: &str) -> Result<ApartmentId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(ApartmentId::from_uuid)
}

fn parse_filter(query: ApartmentListQuery) -> Result<ApartmentFilter, Error> {
    let bedrooms = parse_bedrooms(query.bedrooms)?;
    Ok(ApartmentFilter::new(
        bedrooms,
        query.min_price,
        query.max_price,
    )?)
}

fn parse_draft(payload: CreateApartmentRequest) -> Result<ApartmentDraft, Error> {
    let bedrooms = require(payload.bedrooms, FieldName::new("bedrooms"))?;
    Ok(ApartmentDraft {
        title: require(payload.title, FieldName::new("title"))?,
        description: require(payload.description, FieldName::new("description"))?,
        bedrooms: Bedrooms::try_from(bedrooms)?,
        bathrooms: require(payload.bathrooms, FieldName::new("bathrooms"))?,
        max_guests: require(payload.max_guests, FieldName::new("maxGuests"))?,
        price_per_night: require(payload.price_per_night, FieldName::new("pricePerNight"))?,
        address: require(payload.address, FieldName::new("address"))?,
        city: require(payload.city, FieldName::new("city"))?,
        country: require(payload.country, FieldName::new("country"))?,
        square_meters: require(payload.square_meters, FieldName::new("squareMeters"))?,
        amenities: payload.amenities,
        image_urls: payload.images,
        is_available: payload.is_available.unwrap_or(true),
    })
}

fn parse_patch(payload: UpdateApartmentRequest) -> Result<ApartmentPatch, Error> {
    Ok(ApartmentPatch {
        title: payload.title,
        description: payload.description,
        bedrooms: parse_bedrooms(payload.bedrooms)?,
        bathrooms: payload.bathrooms,
        max_guests: payload.max_guests,
        price_per_night: payload.price_per_night,
        address: payload.address,
        city: payload.city,
        country: payload.country,
        square_meters: payload.square_meters,
        amenities: payload.amenities,
        is_available: payload.is_available,
    })
}

/// Available listings, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/apartments",
    params(ApartmentListQuery),
    responses(
        (status = 200, description = "Available apartments", body = [ApartmentSchema]),
        (status = 400, description = "Invalid filter", body = ErrorSchema)
    ),
    tags = ["apartments"],
    operation_id = "listApartments",
    security([])
)]
#[get("/apartments")]
pub async fn list_apartments(
    state: web::Data<HttpState>,
    query: web::Query<ApartmentListQuery>,
) -> ApiResult<web::Json<Vec<Apartment>>> {
    let filter = parse_filter(query.into_inner())?;
    Ok(web::Json(state.apartments.list(filter).await?))
}

/// One listing with its images.
#[utoipa::path(
    get,
    path = "/api/v1/apartments/{id}",
    params(("id" = String, Path, description = "Apartment id")),
    responses(
        (status = 200, description = "Apartment", body = ApartmentSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["apartments"],
    operation_id = "getApartment",
    security([])
)]
#[get("/apartments/{id}")]
pub async fn get_apartment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Apartment>> {
    let id = parse_apartment_id(&path)?;
    Ok(web::Json(state.apartments.get(id).await?))
}

/// Whether the apartment is free for the given dates.
#[utoipa::path(
    get,
    path = "/api/v1/apartments/{id}/availability",
    params(("id" = String, Path, description = "Apartment id"), AvailabilityQuery),
    responses(
        (status = 200, description = "Availability", body = AvailabilitySchema),
        (status = 400, description = "Invalid id or date range", body = ErrorSchema)
    ),
    tags = ["apartments"],
    operation_id = "checkAvailability",
    security([])
)]
#[get("/apartments/{id}/availability")]
pub async fn check_availability(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<AvailabilityQuery>,
) -> ApiResult<web::Json<Availability>> {
    let id = parse_apartment_id(&path)?;
    let AvailabilityQuery {
        check_in,
        check_out,
    } = query.into_inner();
    let check_in = require(check_in, FieldName::new("checkIn"))?;
    let check_out = require(check_out, FieldName::new("checkOut"))?;
    Ok(web::Json(
        state
            .bookings
            .availability(id, check_in, check_out)
            .await?,
    ))
}

/// Publish a listing.
#[utoipa::path(
    post,
    path = "/api/v1/apartments",
    request_body = CreateApartmentRequest,
    responses(
        (status = 201, description = "Created", body = ApartmentSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema)
    ),
    tags = ["apartments"],
    operation_id = "createApartment"
)]
#[post("/apartments")]
pub async fn create_apartment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateApartmentRequest>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_requester()?;
    let draft = parse_draft(payload.into_inner())?;
    let apartment = state.apartments_command.create(&requester, draft).await?;
    Ok(HttpResponse::Created().json(apartment))
}

/// Edit a listing.
#[utoipa::path(
    patch,
    path = "/api/v1/apartments/{id}",
    params(("id" = String, Path, description = "Apartment id")),
    request_body = UpdateApartmentRequest,
    responses(
        (status = 200, description = "Updated", body = ApartmentSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["apartments"],
    operation_id = "updateApartment"
)]
#[patch("/apartments/{id}")]
pub async fn update_apartment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateApartmentRequest>,
) -> ApiResult<web::Json<Apartment>> {
    let requester = session.require_requester()?;
    let id = parse_apartment_id(&path)?;
    let patch = parse_patch(payload.into_inner())?;
    Ok(web::Json(
        state.apartments_command.update(&requester, id, patch).await?,
    ))
}

/// Remove a listing that has no bookings.
#[utoipa::path(
    delete,
    path = "/api/v1/apartments/{id}",
    params(("id" = String, Path, description = "Apartment id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id or apartment has bookings", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["apartments"],
    operation_id = "deleteApartment"
)]
#[delete("/apartments/{id}")]
pub async fn delete_apartment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_requester()?;
    let id = parse_apartment_id(&path)?;
    state.apartments_command.delete(&requester, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
