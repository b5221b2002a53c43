pub mod assertions;
pub mod builder;
pub mod platform;
pub mod responder;

pub use assertions::ResponderAssertions;
pub use builder::{interaction, interaction_with_options, test_context, MockPlugin, MockPluginBuilder};
pub use platform::{MockPlatform, PlatformCall, PlatformOp};
pub use responder::{RecordingResponder, ResponderCall};
