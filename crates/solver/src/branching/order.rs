use super::{
    argmin,
    Brancher,
    DecisionContext,
};
use crate::Item;
use rand::{
    rngs::SmallRng,
    Rng,
};

/// Chooses the free item with the smallest projected cover.
#[derive(Debug, Default, Copy, Clone)]
pub struct MinCov;

impl Brancher for MinCov {
    fn decide(&mut self, context: &DecisionContext, _rng: &mut SmallRng) -> Option<Item> {
        argmin(
            context
                .extensions
                .projections()
                .map(|(item, projection)| (item, projection.count_ones() as f64)),
        )
    }
}

/// Chooses the free item with the smallest id.
#[derive(Debug, Default, Copy, Clone)]
pub struct InputOrder;

impl Brancher for InputOrder {
    fn decide(&mut self, context: &DecisionContext, _rng: &mut SmallRng) -> Option<Item> {
        context.extensions.free_items().next()
    }
}

/// Chooses the free item with the largest id.
#[derive(Debug, Default, Copy, Clone)]
pub struct ReverseOrder;

impl Brancher for ReverseOrder {
    fn decide(&mut self, context: &DecisionContext, _rng: &mut SmallRng) -> Option<Item> {
        context.extensions.free_items().last()
    }
}

/// Chooses a uniformly random free item.
#[derive(Debug, Default, Copy, Clone)]
pub struct RandomOrder;

impl Brancher for RandomOrder {
    fn decide(&mut self, context: &DecisionContext, rng: &mut SmallRng) -> Option<Item> {
        let len_free = context.extensions.len_free();
        if len_free == 0 {
            return None
        }
        context
            .extensions
            .free_items()
            .nth(rng.gen_range(0, len_free))
    }
}
