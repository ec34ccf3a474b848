//! 요청 동사
//!
//! HTTP 메서드 이름으로 핸들러를 찾는 대신, 라우터를 만들 때
//! 각 Verb를 핸들러에 명시적으로 연결합니다.

use std::fmt;

/// CRUD 요청 동사
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }

    /// 배치 변경 요청에서 허용되는지
    pub fn allows_batch(&self) -> bool {
        !matches!(self, Verb::Get)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_verbs() {
        assert!(!Verb::Get.allows_batch());
        assert!(Verb::Post.allows_batch());
        assert!(Verb::Put.allows_batch());
        assert!(Verb::Delete.allows_batch());
        assert_eq!(Verb::Delete.to_string(), "DELETE");
    }
}
