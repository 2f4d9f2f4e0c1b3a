use chrono::Utc;
use tracing::info;

use nomas_auth_types::token::{TokenType, issue_token, validate_refresh_token};
use nomas_domain::user::Rol;

use crate::config::JwtSettings;
use crate::domain::repository::{ClienteRepository, ConfigRepository, UserRepository};
use crate::domain::types::{NewCliente, NewUser, Profile, User, validate_username};
use crate::error::{ApiError, FieldErrors};
use crate::infra::password::PasswordHasher;
use crate::usecase::{check_email, check_len, check_password};

fn sign(user_id: i32, token_type: TokenType, jwt: &JwtSettings) -> Result<String, ApiError> {
    let ttl = match token_type {
        TokenType::Access => jwt.access_ttl_secs,
        TokenType::Refresh => jwt.refresh_ttl_secs,
    };
    let issued = issue_token(user_id, token_type, ttl, &jwt.secret)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("sign {token_type:?} token: {e}")))?;
    Ok(issued.token)
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub hasher: PasswordHasher,
    pub jwt: JwtSettings,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<TokenPair, ApiError> {
        let user = self
            .users
            .find_by_username(&input.username)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;
        if !self
            .hasher
            .verify(&input.password, &user.password_hash)
            .await?
        {
            return Err(ApiError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(ApiError::InvalidCredentials);
        }

        self.users.touch_last_login(user.id, Utc::now()).await?;
        info!(user_id = user.id, "login");
        Ok(TokenPair {
            access: sign(user.id, TokenType::Access, &self.jwt)?,
            refresh: sign(user.id, TokenType::Refresh, &self.jwt)?,
        })
    }
}

// ── Refresh ──────────────────────────────────────────────────────────────────

pub struct RefreshUseCase<U: UserRepository> {
    pub users: U,
    pub jwt: JwtSettings,
}

impl<U: UserRepository> RefreshUseCase<U> {
    /// Trade a refresh token for a new access token.
    pub async fn execute(&self, refresh: &str) -> Result<String, ApiError> {
        let info =
            validate_refresh_token(refresh, &self.jwt.secret).map_err(|_| ApiError::InvalidToken)?;
        let user = self
            .users
            .find_by_id(info.user_id)
            .await?
            .ok_or(ApiError::InvalidToken)?;
        if !user.is_active {
            return Err(ApiError::InvalidToken);
        }
        sign(user.id, TokenType::Access, &self.jwt)
    }
}

// ── Public client registration ───────────────────────────────────────────────

pub struct RegisterClienteInput {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub empresa_nombre: Option<String>,
    pub empresa_rut: Option<String>,
}

pub struct RegisterClienteUseCase<U, C, K>
where
    U: UserRepository,
    C: ClienteRepository,
    K: ConfigRepository,
{
    pub users: U,
    pub clientes: C,
    pub config: K,
    pub hasher: PasswordHasher,
}

impl<U, C, K> RegisterClienteUseCase<U, C, K>
where
    U: UserRepository,
    C: ClienteRepository,
    K: ConfigRepository,
{
    pub async fn execute(&self, input: RegisterClienteInput) -> Result<User, ApiError> {
        if !self
            .config
            .get_or_create()
            .await?
            .permitir_registro_publico_clientes
        {
            return Err(ApiError::Forbidden);
        }

        let mut errors = FieldErrors::new();
        if !validate_username(&input.username) {
            errors.add("username", "enter a valid username");
        } else if self.users.find_by_username(&input.username).await?.is_some() {
            errors.add("username", "a user with that username already exists");
        }
        check_password(&mut errors, "password", &input.password);
        check_len(&mut errors, "first_name", &input.first_name, 150);
        check_len(&mut errors, "last_name", &input.last_name, 150);
        check_email(&mut errors, "email", &input.email);

        let nombre = input.empresa_nombre.filter(|v| !v.trim().is_empty());
        let rut = input.empresa_rut.filter(|v| !v.trim().is_empty());
        let cliente = match (nombre, rut) {
            (Some(nombre), Some(rut)) => {
                check_len(&mut errors, "empresa_nombre", &nombre, 150);
                check_len(&mut errors, "empresa_rut", &rut, 20);
                if self.clientes.rut_taken(&rut, None).await? {
                    errors.add("empresa_rut", "a cliente with this rut already exists");
                }
                Some(NewCliente {
                    nombre,
                    rut,
                    direccion: String::new(),
                    telefono: String::new(),
                    email: input.email.clone(),
                    usuario_id: None,
                    activo: true,
                })
            }
            _ => None,
        };
        errors.into_result()?;

        let user = NewUser {
            username: input.username,
            password_hash: self.hasher.hash(&input.password).await?,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            is_active: true,
            is_superuser: false,
            profile: Profile {
                rol: Rol::Cliente,
                ..Profile::default()
            },
        };
        let created = self
            .users
            .create_with_cliente(&user, cliente.as_ref())
            .await?;
        info!(
            user_id = created.id,
            with_cliente = cliente.is_some(),
            "registered cliente user"
        );
        Ok(created)
    }
}
