//! JWT 令牌验证服务
//!
//! 身份服务 (外部协作方) 使用共享密钥签发令牌，本服务只负责验证和解析。

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use shared::models::Role;
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节，与身份服务共享)
    pub secret: String,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using development key", e);
                    "sarai-development-key-must-be-replaced-in-production".to_string()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "sarai-auth".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "sarai-api".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 用户显示名称
    pub name: String,
    /// 角色: SUPER_ADMIN | STAFF | GUEST
    pub role: Role,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Config error: {0}")]
    ConfigError(String),
}

/// 从环境变量加载 JWT 密钥
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => Err(JwtError::ConfigError(
            "JWT_SECRET environment variable not set".to_string(),
        )),
    }
}

/// JWT 令牌服务 (仅验证)
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            decoding_key,
        }
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求处理函数
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: i64,
    /// 用户显示名称
    pub name: String,
    /// 角色
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken(format!("Non-numeric subject: {}", claims.sub)))?;
        Ok(Self {
            id,
            name: claims.name,
            role: claims.role,
        })
    }
}

impl CurrentUser {
    /// 是否员工或以上 (STAFF / SUPER_ADMIN)
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// 是否超级管理员
    pub fn is_super_admin(&self) -> bool {
        matches!(self.role, Role::SuperAdmin)
    }

    /// 资源归属检查: 本人或员工
    pub fn can_access_user(&self, user_id: i64) -> bool {
        self.is_staff() || self.id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            issuer: "sarai-auth".to_string(),
            audience: "sarai-api".to_string(),
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(role: Role, exp_offset: i64) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: "42".to_string(),
            name: "Asha".to_string(),
            role,
            exp: now + exp_offset,
            iat: now,
            iss: "sarai-auth".to_string(),
            aud: "sarai-api".to_string(),
        }
    }

    #[test]
    fn test_validate_token_roundtrip() {
        let config = test_config();
        let service = JwtService::with_config(config.clone());
        let token = sign(&claims(Role::Guest, 3600), &config.secret);

        let parsed = service.validate_token(&token).unwrap();
        assert_eq!(parsed.sub, "42");
        assert_eq!(parsed.role, Role::Guest);

        let user = CurrentUser::try_from(parsed).unwrap();
        assert_eq!(user.id, 42);
        assert!(!user.is_staff());
        assert!(user.can_access_user(42));
        assert!(!user.can_access_user(7));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_config();
        let service = JwtService::with_config(config.clone());
        let token = sign(&claims(Role::Staff, -3600), &config.secret);

        match service.validate_token(&token) {
            Err(JwtError::ExpiredToken) => {}
            other => panic!("expected ExpiredToken, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let service = JwtService::with_config(config);
        let token = sign(
            &claims(Role::Staff, 3600),
            "another-secret-another-secret-32",
        );
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_staff_roles() {
        let staff = CurrentUser {
            id: 1,
            name: "S".into(),
            role: Role::Staff,
        };
        let admin = CurrentUser {
            id: 2,
            name: "A".into(),
            role: Role::SuperAdmin,
        };
        assert!(staff.is_staff());
        assert!(!staff.is_super_admin());
        assert!(admin.is_staff());
        assert!(admin.is_super_admin());
        assert!(staff.can_access_user(999));
    }
}
