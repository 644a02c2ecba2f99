// Draft core: ordering, pool, queues, clock, engine, and roster derivation.

pub mod clock;
pub mod engine;
pub mod order;
pub mod pick;
pub mod pool;
pub mod queue;
pub mod roster;
