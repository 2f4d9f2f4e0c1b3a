use tracing::info;

use crate::domain::repository::ConfigRepository;
use crate::domain::types::{Caller, ConfigChanges, SystemConfig};
use crate::error::{ApiError, FieldErrors};
use crate::usecase::{check_email, check_len, check_required, require_admin};

pub struct GetConfigUseCase<K: ConfigRepository> {
    pub config: K,
}

impl<K: ConfigRepository> GetConfigUseCase<K> {
    pub async fn execute(&self) -> Result<SystemConfig, ApiError> {
        self.config.get_or_create().await
    }
}

pub struct UpdateConfigUseCase<K: ConfigRepository> {
    pub config: K,
}

impl<K: ConfigRepository> UpdateConfigUseCase<K> {
    pub async fn execute(
        &self,
        caller: &Caller,
        changes: ConfigChanges,
    ) -> Result<SystemConfig, ApiError> {
        require_admin(caller)?;

        let mut errors = FieldErrors::new();
        if let Some(v) = &changes.nombre_sistema {
            check_required(&mut errors, "nombre_sistema", v);
            check_len(&mut errors, "nombre_sistema", v, 150);
        }
        if let Some(v) = &changes.razon_social {
            check_len(&mut errors, "razon_social", v, 200);
        }
        if let Some(v) = &changes.rut_empresa {
            check_len(&mut errors, "rut_empresa", v, 20);
        }
        if let Some(v) = &changes.direccion {
            check_len(&mut errors, "direccion", v, 255);
        }
        if let Some(v) = &changes.telefono_contacto {
            check_len(&mut errors, "telefono_contacto", v, 20);
        }
        if let Some(v) = &changes.email_contacto {
            check_email(&mut errors, "email_contacto", v);
        }
        if let Some(v) = &changes.sitio_web {
            check_len(&mut errors, "sitio_web", v, 200);
        }
        if changes
            .dias_min_anticipacion_cancelacion
            .is_some_and(|dias| dias < 0)
        {
            errors.add(
                "dias_min_anticipacion_cancelacion",
                "ensure this value is greater than or equal to 0",
            );
        }
        errors.into_result()?;

        let updated = self.config.update(&changes).await?;
        info!(by = caller.user_id(), "system config updated");
        Ok(updated)
    }
}
