pub mod streamer;
pub mod subscriber_history;

pub use streamer::Entity as StreamerEntity;
pub use subscriber_history::Entity as SubscriberHistoryEntity;
