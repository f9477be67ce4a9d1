use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;

use crate::dtos::contract::{ContractEnvelope, ContractListResponse, CreateContractRequest};
use crate::middleware::AuthUser;
use crate::utils::ValidatedJson;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/contratos",
    responses(
        (status = 200, description = "Contracts of the calling owner", body = ContractListResponse),
        (status = 403, description = "Owners only", body = ErrorResponse)
    ),
    tag = "Contracts",
    security(("bearer_auth" = []))
)]
pub async fn list_contracts(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ContractListResponse>, AppError> {
    let contracts = state.contract_service.list(user.id).await?;
    Ok(Json(ContractListResponse {
        contratos: contracts.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/contratos",
    request_body = CreateContractRequest,
    responses(
        (status = 201, description = "Contract created", body = ContractEnvelope),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse)
    ),
    tag = "Contracts",
    security(("bearer_auth" = []))
)]
pub async fn create_contract(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateContractRequest>,
) -> Result<(StatusCode, Json<ContractEnvelope>), AppError> {
    let contract = state.contract_service.create(user.id, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ContractEnvelope {
            contrato: contract.into(),
        }),
    ))
}
