/// Heatmap category, each backed by one numeric attribute of the point
/// dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Sum,
    Female,
    Male,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Sum, Category::Female, Category::Male];

    /// Attribute key in the point dataset's properties.
    pub const fn property_name(self) -> &'static str {
        match self {
            Category::Sum => "Sum",
            Category::Female => "Female",
            Category::Male => "Male",
        }
    }

    /// Stable identifier of the category's heatmap layer.
    pub const fn layer_id(self) -> &'static str {
        match self {
            Category::Sum => "sum-layer",
            Category::Female => "female-layer",
            Category::Male => "male-layer",
        }
    }

    /// Checkbox label in the control panel.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Sum => "Sum",
            Category::Female => "Female",
            Category::Male => "Male",
        }
    }
}

/// UI state the layer configuration is derived from.
///
/// At most one category is ever active; the enum-valued field makes a
/// two-categories-at-once state unrepresentable. `active` starts as `None`
/// and never returns to it, since selecting a category only replaces the
/// previous selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub slider_position: usize,
    pub opacity: f64,
    pub active: Option<Category>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            slider_position: 0,
            opacity: 1.0,
            active: None,
        }
    }
}

impl ViewState {
    pub fn select_category(&mut self, category: Category) {
        self.active = Some(category);
    }

    pub fn is_active(&self, category: Category) -> bool {
        self.active == Some(category)
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Pull the slider back into range for `date_count` dates.
    pub fn clamp_slider(&mut self, date_count: usize) {
        if date_count == 0 {
            self.slider_position = 0;
        } else if self.slider_position >= date_count {
            self.slider_position = date_count - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, ViewState};

    #[test]
    fn selection_is_exclusive() {
        let mut state = ViewState::default();
        assert_eq!(state.active, None);

        state.select_category(Category::Sum);
        assert!(state.is_active(Category::Sum));

        state.select_category(Category::Female);
        assert!(state.is_active(Category::Female));
        assert!(!state.is_active(Category::Sum));
        assert!(!state.is_active(Category::Male));
    }

    #[test]
    fn reselecting_the_active_category_keeps_it_active() {
        let mut state = ViewState::default();
        state.select_category(Category::Male);
        state.select_category(Category::Male);
        assert!(state.is_active(Category::Male));
    }

    #[test]
    fn no_toggle_sequence_activates_two() {
        let mut state = ViewState::default();
        for category in [
            Category::Sum,
            Category::Male,
            Category::Male,
            Category::Female,
            Category::Sum,
        ] {
            state.select_category(category);
            let active = Category::ALL
                .iter()
                .filter(|&&c| state.is_active(c))
                .count();
            assert_eq!(active, 1);
        }
    }

    #[test]
    fn opacity_clamps_to_unit_range() {
        let mut state = ViewState::default();
        state.set_opacity(1.4);
        assert_eq!(state.opacity, 1.0);
        state.set_opacity(-0.2);
        assert_eq!(state.opacity, 0.0);
        state.set_opacity(0.3);
        assert_eq!(state.opacity, 0.3);
    }

    #[test]
    fn slider_clamps_to_date_count() {
        let mut state = ViewState {
            slider_position: 9,
            ..ViewState::default()
        };
        state.clamp_slider(4);
        assert_eq!(state.slider_position, 3);
        state.clamp_slider(0);
        assert_eq!(state.slider_position, 0);
    }
}
