//! Flattening: turn the location forest into the ordered option list that
//! feeds every location dropdown in the portal.

use serde::{Deserialize, Serialize};

use crate::models::location::LocationNode;
use crate::services::location::path;

/// One selectable entry produced from the forest.
///
/// `value` is the full path string, `label` the node's own name, `level` the
/// structural depth (0 = primary .. 5 = floor leaf). `id` falls back to the
/// path when the backend did not assign one; it is only used for stable row
/// keys, never for lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlattenedOption {
    pub id: String,
    pub value: String,
    pub label: String,
    pub level: u8,
}

/// Flatten the forest into dropdown options, pre-order depth-first, siblings
/// in array order.
///
/// Nodes with blank labels emit nothing but their descendants are still
/// visited; the blank level contributes no path segment. Duplicate path
/// strings are kept as-is, this feeds a dropdown, not a set.
pub fn flatten(forest: &[LocationNode]) -> Vec<FlattenedOption> {
    let mut options = Vec::new();

    for node in forest {
        let primary_path = path::child("", &node.primary_location);
        push_option(
            &mut options,
            node.id.as_deref(),
            &node.primary_location,
            &primary_path,
            0,
        );

        for state in &node.sub_locations {
            let state_path = path::child(&primary_path, &state.primary_sub_location);
            push_option(
                &mut options,
                state.id.as_deref(),
                &state.primary_sub_location,
                &state_path,
                1,
            );

            for city in &state.secondary_locations {
                let city_path = path::child(&state_path, &city.secondary_location);
                push_option(
                    &mut options,
                    city.id.as_deref(),
                    &city.secondary_location,
                    &city_path,
                    2,
                );

                for area in &city.secondary_sub_locations {
                    let area_path = path::child(&city_path, &area.secondary_sub_location);
                    push_option(
                        &mut options,
                        area.id.as_deref(),
                        &area.secondary_sub_location,
                        &area_path,
                        3,
                    );

                    for building in &area.third_locations {
                        let building_path = path::child(&area_path, &building.third_location);
                        push_option(
                            &mut options,
                            building.id.as_deref(),
                            &building.third_location,
                            &building_path,
                            4,
                        );

                        // The floor leaf is a bare string, not a child node
                        if let Some(floor) = &building.third_sub_location {
                            let floor_path = path::child(&building_path, floor);
                            push_option(&mut options, None, floor, &floor_path, 5);
                        }
                    }
                }
            }
        }
    }

    options
}

fn push_option(
    options: &mut Vec<FlattenedOption>,
    id: Option<&str>,
    label: &str,
    value: &str,
    level: u8,
) {
    if path::is_blank(label) {
        return;
    }
    options.push(FlattenedOption {
        id: id.map(str::to_string).unwrap_or_else(|| value.to_string()),
        value: value.to_string(),
        label: label.trim().to_string(),
        level,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::{AreaNode, BuildingNode, CityNode, StateNode};

    fn campus_fixture() -> Vec<LocationNode> {
        vec![LocationNode {
            id: Some("l0".into()),
            primary_location: "Campus A".into(),
            sub_locations: vec![StateNode {
                id: Some("l1".into()),
                primary_sub_location: "North Wing".into(),
                secondary_locations: vec![CityNode {
                    id: Some("l2".into()),
                    secondary_location: "Floor 1".into(),
                    secondary_sub_locations: vec![],
                }],
            }],
            created_at: None,
        }]
    }

    fn deep_fixture() -> Vec<LocationNode> {
        vec![LocationNode {
            id: Some("p".into()),
            primary_location: "Metro Plant".into(),
            sub_locations: vec![StateNode {
                id: Some("s".into()),
                primary_sub_location: "Ohio".into(),
                secondary_locations: vec![CityNode {
                    id: Some("c".into()),
                    secondary_location: "Columbus".into(),
                    secondary_sub_locations: vec![AreaNode {
                        id: Some("a".into()),
                        secondary_sub_location: "East Gate".into(),
                        third_locations: vec![BuildingNode {
                            id: Some("b".into()),
                            third_location: "Warehouse 7".into(),
                            third_sub_location: Some("Mezzanine".into()),
                        }],
                    }],
                }],
            }],
            created_at: None,
        }]
    }

    #[test]
    fn emits_one_option_per_labeled_node() {
        let options = flatten(&deep_fixture());
        // primary, state, city, area, building, floor leaf
        assert_eq!(options.len(), 6);
        assert_eq!(
            options.last().unwrap().value,
            "Metro Plant > Ohio > Columbus > East Gate > Warehouse 7 > Mezzanine"
        );
        assert_eq!(options.last().unwrap().level, 5);
    }

    #[test]
    fn end_to_end_three_level_scenario() {
        let options = flatten(&campus_fixture());
        let values: Vec<(&str, u8)> = options
            .iter()
            .map(|o| (o.value.as_str(), o.level))
            .collect();
        assert_eq!(
            values,
            vec![
                ("Campus A", 0),
                ("Campus A > North Wing", 1),
                ("Campus A > North Wing > Floor 1", 2),
            ]
        );
    }

    #[test]
    fn blank_label_is_skipped_but_children_survive() {
        let mut forest = campus_fixture();
        forest[0].sub_locations[0].primary_sub_location = "".into();

        let options = flatten(&forest);
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        // The state level vanishes from both the option list and the child path
        assert_eq!(values, vec!["Campus A", "Campus A > Floor 1"]);
        assert_eq!(options[1].level, 2);
    }

    #[test]
    fn missing_child_arrays_are_empty() {
        let forest = vec![LocationNode {
            id: None,
            primary_location: "Lone Site".into(),
            sub_locations: vec![],
            created_at: None,
        }];
        let options = flatten(&forest);
        assert_eq!(options.len(), 1);
        // No backend id: the path stands in as the stable key
        assert_eq!(options[0].id, "Lone Site");
    }

    #[test]
    fn output_is_deterministic() {
        let forest = deep_fixture();
        assert_eq!(flatten(&forest), flatten(&forest));
    }

    #[test]
    fn duplicate_paths_are_not_deduplicated() {
        let mut forest = campus_fixture();
        forest.push(forest[0].clone());
        let options = flatten(&forest);
        assert_eq!(options.len(), 6);
        assert_eq!(options[0].value, options[3].value);
    }
}
