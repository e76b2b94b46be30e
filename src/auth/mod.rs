/// 역할 및 소유권 확인
/// 입찰(구매자 역할)과 경매 관리(소유 경매사 또는 관리자) 양쪽에서 같은 검사를 사용한다.
// region:    --- Imports
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Buyer,
    AuctionHouse,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::AuctionHouse => "auction_house",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Role::Buyer),
            "auction_house" => Ok(Role::AuctionHouse),
            "admin" => Ok(Role::Admin),
            other => Err(format!("알 수 없는 역할: {}", other)),
        }
    }
}
// endregion: --- Role

// region:    --- Principal
/// 소유 경매사 id를 가진 자원
pub trait Owned {
    fn owner_house_id(&self) -> i64;
}

/// 요청을 보낸 사용자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
    /// 승인된 경매사에 연결된 경우에만 설정
    pub auction_house_id: Option<i64>,
}

impl Principal {
    pub fn buyer(user_id: i64) -> Self {
        Self {
            user_id,
            role: Role::Buyer,
            auction_house_id: None,
        }
    }

    pub fn auction_house(user_id: i64, auction_house_id: i64) -> Self {
        Self {
            user_id,
            role: Role::AuctionHouse,
            auction_house_id: Some(auction_house_id),
        }
    }

    pub fn admin(user_id: i64) -> Self {
        Self {
            user_id,
            role: Role::Admin,
            auction_house_id: None,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn is_owner_of(&self, resource: &impl Owned) -> bool {
        self.role == Role::AuctionHouse
            && self.auction_house_id == Some(resource.owner_house_id())
    }

    /// 관리자이거나 자원을 소유한 경매사
    pub fn can_manage(&self, resource: &impl Owned) -> bool {
        self.has_role(Role::Admin) || self.is_owner_of(resource)
    }
}
// endregion: --- Principal
