/// 랏 조회
pub const GET_LOT: &str = r#"
    SELECT id, auction_id, name, description, initial_price, current_bid, bid_count,
           image_urls, status, lot_start_time, lot_end_time, lot_order, created_at
    FROM lots
    WHERE id = $1
"#;

/// 경매의 active 랏 조회 (진행 순서)
pub const GET_ACTIVE_LOTS: &str = r#"
    SELECT id, auction_id, name, description, initial_price, current_bid, bid_count,
           image_urls, status, lot_start_time, lot_end_time, lot_order, created_at
    FROM lots
    WHERE auction_id = $1 AND status = 'active'
    ORDER BY lot_order ASC, id ASC
"#;

/// 랏 입찰가 갱신 (마지막 쓰기 우선)
pub const UPDATE_LOT_BID: &str = "UPDATE lots SET current_bid = $1, bid_count = $2 WHERE id = $3";

/// 랏 입찰가 갱신 (읽은 값과 같을 때만)
pub const UPDATE_LOT_BID_IF_UNCHANGED: &str = r#"
    UPDATE lots SET current_bid = $1, bid_count = $2
    WHERE id = $3 AND current_bid = $4 AND bid_count = $5
"#;

/// 랏 입찰 시간 설정
pub const SET_LOT_WINDOW: &str =
    "UPDATE lots SET lot_start_time = $1, lot_end_time = $2 WHERE id = $3";

/// 경매 조회
pub const GET_AUCTION: &str = r#"
    SELECT id, auction_house_id, title, description, category, start_time, end_time,
           status, is_live, current_lot_id, lot_duration_minutes, created_at
    FROM auctions
    WHERE id = $1
"#;

/// 라이브 진행 중인 경매 조회
pub const GET_LIVE_AUCTIONS: &str = r#"
    SELECT id, auction_house_id, title, description, category, start_time, end_time,
           status, is_live, current_lot_id, lot_duration_minutes, created_at
    FROM auctions
    WHERE is_live = TRUE AND status <> 'closed'
    ORDER BY id ASC
"#;

/// 경매 라이브 상태 갱신
pub const UPDATE_LIVE_STATE: &str =
    "UPDATE auctions SET current_lot_id = $1, is_live = $2, status = $3 WHERE id = $4";

/// 입찰 기록 추가
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (lot_id, bidder_id, amount, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, lot_id, bidder_id, amount, created_at
"#;

/// 랏 입찰 이력 조회
pub const GET_LOT_BIDS: &str = r#"
    SELECT id, lot_id, bidder_id, amount, created_at
    FROM bids
    WHERE lot_id = $1
    ORDER BY created_at DESC, id DESC
"#;

/// 사용자 역할 및 승인된 경매사 조회
pub const GET_PRINCIPAL: &str = r#"
    SELECT p.id AS user_id, p.role, h.id AS auction_house_id
    FROM profiles p
    LEFT JOIN auction_houses h ON h.owner_user_id = p.id AND h.status = 'approved'
    WHERE p.id = $1
    ORDER BY h.id ASC NULLS LAST
    LIMIT 1
"#;
