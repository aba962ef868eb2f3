use crate::models::{Author, ImageUrls, Page, ProfileImageUrls, SearchResult};

pub const SAMPLE_RESPONSE: &str = r#"{
  "total": 133,
  "total_pages": 7,
  "results": [
    {
      "id": "eOLpJytrbsQ",
      "description": "A man drinking a coffee.",
      "likes": 12,
      "user": {
        "username": "johndoe",
        "name": "John Doe",
        "profile_image": {
          "small": "https://images.example/p/s.jpg",
          "medium": "https://images.example/p/m.jpg",
          "large": "https://images.example/p/l.jpg"
        }
      },
      "urls": {
        "raw": "https://images.example/raw.jpg",
        "full": "https://images.example/full.jpg",
        "regular": "https://images.example/regular.jpg",
        "small": "https://images.example/small.jpg",
        "thumb": "https://images.example/thumb.jpg"
      }
    },
    {
      "id": "Hkj3d82Ja1Q",
      "description": null,
      "user": {
        "username": "janedoe",
        "name": "Jane Doe",
        "profile_image": {
          "small": "https://images.example/q/s.jpg",
          "medium": "https://images.example/q/m.jpg",
          "large": "https://images.example/q/l.jpg"
        }
      },
      "urls": {
        "full": "https://images.example/2/full.jpg",
        "regular": "https://images.example/2/regular.jpg",
        "small": "https://images.example/2/small.jpg",
        "thumb": "https://images.example/2/thumb.jpg"
      }
    }
  ]
}"#;

pub fn photo(id: &str, description: Option<&str>) -> SearchResult {
    SearchResult {
        id: id.to_string(),
        description: description.map(str::to_string),
        author: Author {
            username: format!("user-{}", id),
            name: format!("User {}", id),
            profile_image: ProfileImageUrls {
                small: format!("https://images.example/{}/p/s.jpg", id),
                medium: format!("https://images.example/{}/p/m.jpg", id),
                large: format!("https://images.example/{}/p/l.jpg", id),
            },
        },
        image_urls: ImageUrls {
            full: format!("https://images.example/{}/full.jpg", id),
            regular: format!("https://images.example/{}/regular.jpg", id),
            small: format!("https://images.example/{}/small.jpg", id),
            thumb: format!("https://images.example/{}/thumb.jpg", id),
        },
    }
}

/// Page of captioned photos with the given ids.
pub fn page(ids: &[&str], total_pages: u32) -> Page {
    Page {
        results: ids.iter().map(|id| photo(id, Some("caption"))).collect(),
        total_results: ids.len() as u64,
        total_pages,
    }
}
