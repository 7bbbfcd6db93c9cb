//! Uniform-price double auction used at cycle rollover.
//!
//! Buy orders sort price-descending, sell orders price-ascending, ties by
//! sequence number (time priority). Greedy best-against-best matching
//! maximizes the volume tradable at a single price; the clearing price is
//! the midpoint of the valid band between the marginal matched ask and the
//! marginal matched bid. Operates on plain book entries so the round can be
//! settled and tested without touching the ledger.

#[derive(Debug, Clone)]
pub struct BookOrder {
    pub seq: u64,
    pub price: u64,
    pub remaining: u64,
    pub fill: u64,
}

impl BookOrder {
    pub fn new(seq: u64, price: u64, remaining: u64) -> Self {
        Self {
            seq,
            price,
            remaining,
            fill: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cross {
    pub price: u64,
    pub volume: u64,
}

/// Matches the two books in place, recording fills on each order.
/// Returns `None` when no bid crosses an ask; neither book is mutated
/// beyond sorting in that case.
pub fn cross_books(buys: &mut [BookOrder], sells: &mut [BookOrder]) -> Option<Cross> {
    buys.sort_by(|a, b| b.price.cmp(&a.price).then(a.seq.cmp(&b.seq)));
    sells.sort_by(|a, b| a.price.cmp(&b.price).then(a.seq.cmp(&b.seq)));

    let mut bi = 0;
    let mut si = 0;
    let mut volume: u64 = 0;
    let mut marginal_bid: u64 = 0;
    let mut marginal_ask: u64 = 0;

    while bi < buys.len() && si < sells.len() {
        if buys[bi].remaining == buys[bi].fill {
            bi += 1;
            continue;
        }
        if sells[si].remaining == sells[si].fill {
            si += 1;
            continue;
        }
        if buys[bi].price < sells[si].price {
            break;
        }

        let take = (buys[bi].remaining - buys[bi].fill).min(sells[si].remaining - sells[si].fill);
        buys[bi].fill = buys[bi].fill.saturating_add(take);
        sells[si].fill = sells[si].fill.saturating_add(take);
        volume = volume.saturating_add(take);
        marginal_bid = buys[bi].price;
        marginal_ask = sells[si].price;
    }

    if volume == 0 {
        return None;
    }

    // Any price in [marginal_ask, marginal_bid] clears every matched order.
    let price = marginal_ask + (marginal_bid - marginal_ask) / 2;
    Some(Cross { price, volume })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fills(book: &[BookOrder]) -> Vec<(u64, u64)> {
        book.iter().map(|o| (o.seq, o.fill)).collect()
    }

    #[test]
    fn empty_books_do_not_cross() {
        assert_eq!(cross_books(&mut [], &mut []), None);
        let mut buys = vec![BookOrder::new(0, 100, 10)];
        assert_eq!(cross_books(&mut buys, &mut []), None);
        assert_eq!(buys[0].fill, 0);
    }

    #[test]
    fn non_overlapping_books_do_not_cross() {
        let mut buys = vec![BookOrder::new(0, 90, 10)];
        let mut sells = vec![BookOrder::new(1, 100, 10)];
        assert_eq!(cross_books(&mut buys, &mut sells), None);
        assert_eq!(buys[0].fill, 0);
        assert_eq!(sells[0].fill, 0);
    }

    #[test]
    fn single_pair_clears_at_band_midpoint() {
        let mut buys = vec![BookOrder::new(0, 120, 10)];
        let mut sells = vec![BookOrder::new(1, 100, 10)];
        let cross = cross_books(&mut buys, &mut sells).unwrap();
        assert_eq!(cross, Cross { price: 110, volume: 10 });
        assert_eq!(buys[0].fill, 10);
        assert_eq!(sells[0].fill, 10);
    }

    #[test]
    fn partial_fill_leaves_residual() {
        let mut buys = vec![BookOrder::new(0, 100, 4)];
        let mut sells = vec![BookOrder::new(1, 100, 10)];
        let cross = cross_books(&mut buys, &mut sells).unwrap();
        assert_eq!(cross.volume, 4);
        assert_eq!(cross.price, 100);
        assert_eq!(sells[0].fill, 4);
        assert_eq!(sells[0].remaining - sells[0].fill, 6);
    }

    #[test]
    fn equal_price_bids_fill_in_time_priority() {
        // Two buys at the same price, sell side only covers the first.
        let mut buys = vec![BookOrder::new(7, 100, 10), BookOrder::new(3, 100, 10)];
        let mut sells = vec![BookOrder::new(1, 100, 12)];
        let cross = cross_books(&mut buys, &mut sells).unwrap();
        assert_eq!(cross.volume, 12);
        // seq 3 arrived first and fills fully; seq 7 takes the remainder.
        assert_eq!(fills(&buys), vec![(3, 10), (7, 2)]);
    }

    #[test]
    fn better_price_beats_earlier_arrival() {
        let mut buys = vec![BookOrder::new(1, 100, 10), BookOrder::new(2, 110, 10)];
        let mut sells = vec![BookOrder::new(1, 90, 10)];
        cross_books(&mut buys, &mut sells).unwrap();
        assert_eq!(fills(&buys), vec![(2, 10), (1, 0)]);
    }

    #[test]
    fn greedy_match_maximizes_volume() {
        let mut buys = vec![
            BookOrder::new(0, 105, 5),
            BookOrder::new(1, 101, 5),
            BookOrder::new(2, 95, 5),
        ];
        let mut sells = vec![
            BookOrder::new(3, 99, 5),
            BookOrder::new(4, 100, 5),
            BookOrder::new(5, 110, 5),
        ];
        let cross = cross_books(&mut buys, &mut sells).unwrap();
        // Buys at 105 and 101 cross sells at 99 and 100; the 95 bid and
        // 110 ask stay out.
        assert_eq!(cross.volume, 10);
        assert!(cross.price >= 100 && cross.price <= 101);
        assert_eq!(buys[2].fill, 0);
        assert_eq!(sells[2].fill, 0);
    }

    #[test]
    fn extreme_volumes_saturate_instead_of_wrapping() {
        let mut buys = vec![
            BookOrder::new(0, 100, u64::MAX),
            BookOrder::new(1, 100, u64::MAX),
        ];
        let mut sells = vec![
            BookOrder::new(2, 100, u64::MAX),
            BookOrder::new(3, 100, u64::MAX),
        ];
        let cross = cross_books(&mut buys, &mut sells).unwrap();
        assert_eq!(cross.volume, u64::MAX);
        assert!(buys.iter().all(|o| o.fill == u64::MAX));
    }

    #[test]
    fn matched_orders_all_clear_at_the_uniform_price() {
        let mut buys = vec![BookOrder::new(0, 130, 3), BookOrder::new(1, 120, 3)];
        let mut sells = vec![BookOrder::new(2, 100, 3), BookOrder::new(3, 115, 3)];
        let cross = cross_books(&mut buys, &mut sells).unwrap();
        for o in buys.iter().filter(|o| o.fill > 0) {
            assert!(o.price >= cross.price);
        }
        for o in sells.iter().filter(|o| o.fill > 0) {
            assert!(o.price <= cross.price);
        }
        let bought: u64 = buys.iter().map(|o| o.fill).sum();
        let sold: u64 = sells.iter().map(|o| o.fill).sum();
        assert_eq!(bought, sold);
        assert_eq!(bought, cross.volume);
    }
}
