//! Domain models
//!
//! Everything a single try-on session owns, plus the request/response shapes
//! exchanged with the two collaborators.

pub mod body;
pub mod clothing;
pub mod image;
pub mod requests;
pub mod submission;

pub use body::BodyDetails;
pub use clothing::ClothingItem;
pub use image::{ImageSource, ImageUpload, UserImage};
pub use requests::{CompositeRequest, CompositeResponse, RecommendationRequest, StyleRecommendation};
pub use submission::{SubmissionFailure, SubmissionState, TryOnResult};
