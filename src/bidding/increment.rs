/// 최소 입찰 단위표
/// 현재 입찰가(제안 금액이 아님) 기준으로 다음 입찰의 최소 증가폭을 정한다.

/// 현재 입찰가 구간별 최소 증가폭
const INCREMENT_STEPS: [(i64, i64); 3] = [(100_000, 1_000), (500_000, 5_000), (1_000_000, 10_000)];
const TOP_INCREMENT: i64 = 50_000;

/// 현재 입찰가에 대한 최소 증가폭
pub fn increment_schedule(current_bid: i64) -> i64 {
    INCREMENT_STEPS
        .iter()
        .find(|(upper, _)| current_bid < *upper)
        .map(|(_, step)| *step)
        .unwrap_or(TOP_INCREMENT)
}

/// 다음 입찰로 받아들일 수 있는 최소 금액
/// i64 범위를 넘으면 더 높은 입찰이 없으므로 None
pub fn min_acceptable_bid(current_bid: i64) -> Option<i64> {
    current_bid.checked_add(increment_schedule(current_bid))
}
