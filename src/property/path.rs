//! Property paths: `name`, `array[2]`, `array[2].field`.

use super::container::Property;
use super::PropertyError;

/// One step of a property path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment<'a> {
    pub name: &'a str,
    pub index: Option<usize>,
}

/// Split a path into segments.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment<'_>>, PropertyError> {
    let invalid = |message: &str| PropertyError::InvalidPath {
        path: path.to_string(),
        message: message.to_string(),
    };

    let mut segments = Vec::new();
    for item in path.split('.') {
        let segment = match item.find('[') {
            None => PathSegment {
                name: item,
                index: None,
            },
            Some(open) => {
                let inner = item[open + 1..]
                    .strip_suffix(']')
                    .ok_or_else(|| invalid("missing ']'"))?;
                let index = inner
                    .parse()
                    .map_err(|_| invalid("index is not a number"))?;
                PathSegment {
                    name: &item[..open],
                    index: Some(index),
                }
            }
        };
        if segment.name.is_empty() {
            return Err(invalid("empty name"));
        }
        segments.push(segment);
    }
    Ok(segments)
}

/// Find the property at `path` below `properties`.
pub fn find<'p>(properties: &'p [Property], path: &str) -> Result<&'p Property, PropertyError> {
    let segments = parse_path(path)?;
    let last = segments.len() - 1;
    let mut current = properties;

    for (i, segment) in segments.iter().enumerate() {
        let property = current
            .iter()
            .find(|p| p.name() == segment.name)
            .ok_or_else(|| PropertyError::UnknownProperty(path.to_string()))?;

        let property = match segment.index {
            None => property,
            Some(index) => {
                let array = property.as_array().ok_or_else(|| PropertyError::InvalidPath {
                    path: path.to_string(),
                    message: format!("'{}' is not an array", segment.name),
                })?;
                array
                    .element(index)
                    .ok_or_else(|| PropertyError::IndexOutOfBounds {
                        property: segment.name.to_string(),
                        index,
                        size: array.size(),
                    })?
            }
        };

        if i == last {
            return Ok(property);
        }
        current = property
            .as_struct()
            .map(|s| s.fields())
            .ok_or_else(|| PropertyError::InvalidPath {
                path: path.to_string(),
                message: format!("'{}' has no fields", segment.name),
            })?;
    }

    Err(PropertyError::UnknownProperty(path.to_string()))
}

/// Mutable variant of [`find`]. With `create_elements`, arrays grow to
/// hold the requested index.
pub fn find_mut<'p>(
    properties: &'p mut [Property],
    path: &str,
    create_elements: bool,
) -> Result<&'p mut Property, PropertyError> {
    let segments = parse_path(path)?;
    let last = segments.len() - 1;
    let mut current = properties;

    for (i, segment) in segments.iter().enumerate() {
        let property = current
            .iter_mut()
            .find(|p| p.name() == segment.name)
            .ok_or_else(|| PropertyError::UnknownProperty(path.to_string()))?;

        let property = match segment.index {
            None => property,
            Some(index) => {
                let array = property
                    .as_array_mut()
                    .ok_or_else(|| PropertyError::InvalidPath {
                        path: path.to_string(),
                        message: format!("'{}' is not an array", segment.name),
                    })?;
                if create_elements && array.size() <= index {
                    array.resize(index.saturating_add(1))?;
                }
                let size = array.size();
                array
                    .element_mut(index)
                    .ok_or_else(|| PropertyError::IndexOutOfBounds {
                        property: segment.name.to_string(),
                        index,
                        size,
                    })?
            }
        };

        if i == last {
            return Ok(property);
        }
        current = property
            .as_struct_mut()
            .map(|s| s.fields_mut())
            .ok_or_else(|| PropertyError::InvalidPath {
                path: path.to_string(),
                message: format!("'{}' has no fields", segment.name),
            })?;
    }

    Err(PropertyError::UnknownProperty(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{
        ArrayProperty, Category, PropertyDescriptor, StructProperty, MAX_ARRAY_SIZE,
    };

    const COLOR_NAME: PropertyDescriptor<String> =
        PropertyDescriptor::new(Category::Display, "color");
    const WIDTH: PropertyDescriptor<i64> = PropertyDescriptor::new(Category::Position, "width");

    fn item(index: usize) -> Property {
        Property::Struct(StructProperty::new(
            "item",
            Category::Display,
            vec![COLOR_NAME.create(format!("c{index}"))],
        ))
    }

    fn properties() -> Vec<Property> {
        vec![
            WIDTH.create(100),
            Property::Array(ArrayProperty::new("items", Category::Display, item, 1, 2)),
        ]
    }

    #[test]
    fn parse_segments() {
        assert_eq!(
            parse_path("items[3].color").unwrap(),
            vec![
                PathSegment {
                    name: "items",
                    index: Some(3)
                },
                PathSegment {
                    name: "color",
                    index: None
                },
            ]
        );
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(parse_path("items[x]").is_err());
        assert!(parse_path("items[1").is_err());
        assert!(parse_path("a..b").is_err());
        assert!(parse_path("").is_err());
    }

    #[test]
    fn find_top_level_and_nested() {
        let props = properties();
        assert_eq!(find(&props, "width").unwrap().get::<i64>().unwrap(), 100);
        assert_eq!(
            find(&props, "items[1].color").unwrap().get::<String>().unwrap(),
            "c1"
        );
        assert!(find(&props, "items[1]").unwrap().as_struct().is_some());
    }

    #[test]
    fn find_errors() {
        let props = properties();
        assert!(matches!(
            find(&props, "height"),
            Err(PropertyError::UnknownProperty(_))
        ));
        assert!(matches!(
            find(&props, "items[5].color"),
            Err(PropertyError::IndexOutOfBounds { index: 5, size: 2, .. })
        ));
        assert!(matches!(
            find(&props, "width[0]"),
            Err(PropertyError::InvalidPath { .. })
        ));
        assert!(matches!(
            find(&props, "width.x"),
            Err(PropertyError::InvalidPath { .. })
        ));
    }

    #[test]
    fn find_mut_creates_elements() {
        let mut props = properties();
        assert!(find_mut(&mut props, "items[3].color", false).is_err());
        let color = find_mut(&mut props, "items[3].color", true).unwrap();
        assert_eq!(color.get::<String>().unwrap(), "c3");
        assert_eq!(find(&props, "items").unwrap().as_array().unwrap().size(), 4);
    }

    #[test]
    fn find_mut_growth_is_bounded() {
        let mut props = properties();
        assert!(matches!(
            find_mut(&mut props, "items[99999999].color", true),
            Err(PropertyError::MaximumSize { .. })
        ));
        assert!(find_mut(&mut props, &format!("items[{}]", usize::MAX), true).is_err());
        assert_eq!(find(&props, "items").unwrap().as_array().unwrap().size(), 2);
        assert!(find_mut(&mut props, &format!("items[{}]", MAX_ARRAY_SIZE - 1), true).is_ok());
    }
}
