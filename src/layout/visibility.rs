/// How much of a person the viewer may see, by hop count from the local
/// user. Deeper connections are progressively anonymized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DistanceTier {
    /// The local user and direct friends.
    Close,
    FriendOfFriend,
    ThirdDegree,
    FourthDegree,
    /// Five or more hops, or not reachable at all.
    Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Presentation {
    pub show_icon: bool,
    pub show_name: bool,
    pub blur: f32,
    pub opacity: f32,
}

impl DistanceTier {
    pub fn for_distance(distance: Option<u32>) -> Self {
        match distance {
            Some(0 | 1) => Self::Close,
            Some(2) => Self::FriendOfFriend,
            Some(3) => Self::ThirdDegree,
            Some(4) => Self::FourthDegree,
            Some(_) | None => Self::Hidden,
        }
    }

    pub fn presentation(self) -> Presentation {
        match self {
            Self::Close => Presentation {
                show_icon: true,
                show_name: true,
                blur: 0.0,
                opacity: 1.0,
            },
            Self::FriendOfFriend => Presentation {
                show_icon: false,
                show_name: true,
                blur: 2.0,
                opacity: 1.0,
            },
            Self::ThirdDegree => Presentation {
                show_icon: false,
                show_name: true,
                blur: 4.0,
                opacity: 1.0,
            },
            Self::FourthDegree => Presentation {
                show_icon: false,
                show_name: true,
                blur: 8.0,
                opacity: 1.0,
            },
            Self::Hidden => Presentation {
                show_icon: false,
                show_name: false,
                blur: 0.0,
                opacity: 0.0,
            },
        }
    }

    pub fn is_visible(self) -> bool {
        self != Self::Hidden
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Close => "friend",
            Self::FriendOfFriend => "friend of a friend",
            Self::ThirdDegree => "3rd degree",
            Self::FourthDegree => "4th degree",
            Self::Hidden => "hidden",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_hop_count() {
        let tiers = (0..7)
            .map(|distance| DistanceTier::for_distance(Some(distance)))
            .collect::<Vec<_>>();
        assert_eq!(
            tiers,
            vec![
                DistanceTier::Close,
                DistanceTier::Close,
                DistanceTier::FriendOfFriend,
                DistanceTier::ThirdDegree,
                DistanceTier::FourthDegree,
                DistanceTier::Hidden,
                DistanceTier::Hidden,
            ]
        );
        assert_eq!(DistanceTier::for_distance(None), DistanceTier::Hidden);
    }

    #[test]
    fn detail_decreases_with_distance() {
        let close = DistanceTier::Close.presentation();
        assert!(close.show_icon && close.show_name && close.blur == 0.0);

        let second = DistanceTier::FriendOfFriend.presentation();
        assert!(!second.show_icon && second.show_name);

        let blurs = [
            DistanceTier::FriendOfFriend,
            DistanceTier::ThirdDegree,
            DistanceTier::FourthDegree,
        ]
        .map(|tier| tier.presentation().blur);
        assert!(blurs[0] > 0.0 && blurs[0] < blurs[1] && blurs[1] < blurs[2]);

        let hidden = DistanceTier::Hidden.presentation();
        assert_eq!(hidden.opacity, 0.0);
        assert!(!hidden.show_name && !DistanceTier::Hidden.is_visible());
    }
}
