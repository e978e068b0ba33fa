//! Cash-Karp Butcher tableau.

/// Stage weights for `k2..k6`. Row `s` weights `[k1, k2, .., k_{s+1}]`.
pub(super) const A: [[f64; 5]; 5] = [
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [3.0 / 10.0, -9.0 / 10.0, 6.0 / 5.0, 0.0, 0.0],
    [-11.0 / 54.0, 5.0 / 2.0, -70.0 / 27.0, 35.0 / 27.0, 0.0],
    [
        1631.0 / 55296.0,
        175.0 / 512.0,
        575.0 / 13824.0,
        44275.0 / 110_592.0,
        253.0 / 4096.0,
    ],
];

/// Fifth-order solution weights for `k1..k6`.
pub(super) const C5: [f64; 6] = [
    37.0 / 378.0,
    0.0,
    250.0 / 621.0,
    125.0 / 594.0,
    0.0,
    512.0 / 1771.0,
];

/// Difference between the fifth- and fourth-order weights.
pub(super) const DC: [f64; 6] = [
    C5[0] - 2825.0 / 27648.0,
    0.0,
    C5[2] - 18575.0 / 48384.0,
    C5[3] - 13525.0 / 55296.0,
    -277.0 / 14336.0,
    C5[5] - 0.25,
];
