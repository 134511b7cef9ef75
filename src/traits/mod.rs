pub mod inspectable;
pub mod notify;
pub mod value_factory;

// Re-export traits
pub use inspectable::{ Inspectable, PropertyTable, Reflect };
pub use notify::{ NotifyPropertyChanged, PropertyChangedEvent, PropertyChangedHandler, SubscriptionId };
pub use value_factory::ValueFactory;
