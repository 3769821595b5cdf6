//! Base Redis repository functionality shared across Redis implementations.

use log::warn;
use redis::RedisError;

use crate::models::RepositoryError;

/// Base trait for Redis repositories providing common error translation.
pub trait RedisRepository {
    /// Convert Redis errors to appropriate RepositoryError types.
    ///
    /// Connection-level failures map to `ConnectionError` so callers can
    /// distinguish an unreachable store from corrupt data.
    fn map_redis_error(&self, error: RedisError, context: &str) -> RepositoryError {
        warn!("Redis operation failed in context '{}': {}", context, error);

        match error.kind() {
            redis::ErrorKind::TypeError => RepositoryError::InvalidData(format!(
                "Redis data type error in operation '{}': {}",
                context, error
            )),
            redis::ErrorKind::AuthenticationFailed => {
                RepositoryError::ConnectionError("Redis authentication failed".to_string())
            }
            redis::ErrorKind::ReadOnly => RepositoryError::InvalidData(format!(
                "Redis is read-only in operation '{}': {}",
                context, error
            )),
            redis::ErrorKind::BusyLoadingError => RepositoryError::ConnectionError(format!(
                "Redis is busy in operation '{}': {}",
                context, error
            )),
            _ => RepositoryError::ConnectionError(format!(
                "Redis operation '{}' failed: {}",
                context, error
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRedisRepository;

    impl RedisRepository for TestRedisRepository {}

    #[test]
    fn test_map_redis_error_type_error() {
        let repo = TestRedisRepository;
        let redis_error = RedisError::from((redis::ErrorKind::TypeError, "Type error"));

        let result = repo.map_redis_error(redis_error, "test_operation");

        match result {
            RepositoryError::InvalidData(msg) => {
                assert!(msg.contains("Redis data type error"));
                assert!(msg.contains("test_operation"));
            }
            _ => panic!("Expected InvalidData error"),
        }
    }

    #[test]
    fn test_map_redis_error_connection_error() {
        let repo = TestRedisRepository;
        let redis_error = RedisError::from((redis::ErrorKind::IoError, "Connection failed"));

        let result = repo.map_redis_error(redis_error, "connection_operation");

        match result {
            RepositoryError::ConnectionError(msg) => {
                assert!(msg.contains("connection_operation"));
            }
            _ => panic!("Expected ConnectionError"),
        }
    }

    #[test]
    fn test_map_redis_error_authentication_failed() {
        let repo = TestRedisRepository;
        let redis_error = RedisError::from((redis::ErrorKind::AuthenticationFailed, "Auth failed"));

        let result = repo.map_redis_error(redis_error, "auth_operation");

        assert!(matches!(result, RepositoryError::ConnectionError(_)));
    }
}
