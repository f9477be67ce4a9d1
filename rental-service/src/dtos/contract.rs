use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Contract;
use crate::services::ContractRequest;
use crate::utils::validation::positive_amount;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateContractRequest {
    pub id_inquilino: i64,

    #[validate(length(min = 1, max = 200, message = "La propiedad es obligatoria"))]
    #[schema(example = "Calle Mayor 12, 3ºB")]
    pub propiedad: String,

    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = String, example = "850.00")]
    pub monto_mensual: Decimal,

    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
}

impl From<CreateContractRequest> for ContractRequest {
    fn from(req: CreateContractRequest) -> Self {
        Self {
            tenant_id: req.id_inquilino,
            property_label: req.propiedad.trim().to_string(),
            monthly_rent: req.monto_mensual,
            start_date: req.fecha_inicio,
            end_date: req.fecha_fin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContractResponse {
    pub id: i64,
    pub id_inquilino: i64,
    pub propiedad: String,
    #[schema(value_type = String, example = "850.00")]
    pub monto_mensual: Decimal,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
    pub activo: bool,
    pub fecha_creacion: DateTime<Utc>,
}

impl From<Contract> for ContractResponse {
    fn from(contract: Contract) -> Self {
        Self {
            id: contract.id,
            id_inquilino: contract.tenant_id,
            propiedad: contract.property_label,
            monto_mensual: contract.monthly_rent,
            fecha_inicio: contract.start_date,
            fecha_fin: contract.end_date,
            activo: contract.active,
            fecha_creacion: contract.created_utc,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContractEnvelope {
    pub contrato: ContractResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContractListResponse {
    pub contratos: Vec<ContractResponse>,
}
