//! Cast member aggregate.

mod aggregate;
mod events;
mod search;

pub use aggregate::{
    CastMember, CastMemberCreateCommand, CastMemberProps, CastMemberType, InvalidCastMemberType,
};
pub use events::{CastMemberCreatedData, CastMemberEvent};
pub use search::{CastMemberFilter, CastMemberSortField};
