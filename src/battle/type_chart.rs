use schema::ElementalType;

/// Combined multiplier of an attacking type against one or two defending types.
pub fn effectiveness(attacking: ElementalType, defending: &[ElementalType]) -> f32 {
    defending
        .iter()
        .map(|&d| ElementalType::type_effectiveness(attacking, d))
        .product()
}

/// The combined multiplier in quarters (0, 1, 2, 4, 8 or 16), for exact
/// integer damage math.
pub fn effectiveness_quarters(attacking: ElementalType, defending: &[ElementalType]) -> u32 {
    defending.iter().fold(4, |quarters, &d| {
        let halves = (ElementalType::type_effectiveness(attacking, d) * 2.0) as u32;
        quarters * halves / 2
    })
}
