use agora_curve::CurvePoint;

pub struct Setup;

pub struct Committed {
    pub private: u64,
    pub public: CurvePoint,
}

pub struct Agreed {
    pub private: u64,
    pub public: CurvePoint,
    pub shared_secret: CurvePoint,
}
