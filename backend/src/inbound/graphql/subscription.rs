//! Subscription root: the `newPhoto` stream.

use async_graphql::{Context, Result, Subscription};
use futures_util::{Stream, StreamExt};

use crate::domain::RequestContext;
use crate::inbound::graphql::types::PhotoObject;
use crate::notify::topics;

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Photos as they are posted, starting from subscription time. The
    /// stream ends when the client disconnects; cancellation releases the
    /// bus registry entry.
    async fn new_photo(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = PhotoObject>> {
        let request = ctx.data::<RequestContext>()?;
        Ok(request
            .notify
            .subscribe(topics::PHOTO_ADDED)
            .map(PhotoObject::from))
    }
}
