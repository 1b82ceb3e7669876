//! 导航项组合
//!
//! 导航栏与个人页的入口都由会话状态决定，角色通过穷尽匹配展开。

use sqlab_shared::Role;

use crate::session::Session;
use crate::web::route::AppRoute;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: AppRoute,
}

impl NavItem {
    fn new(label: &'static str, route: AppRoute) -> Self {
        Self { label, route }
    }
}

/// 导航栏链接
pub fn header_items(session: &Session) -> Vec<NavItem> {
    let mut items = vec![
        NavItem::new("Accueil", AppRoute::Home),
        NavItem::new("Exercices", AppRoute::Exercises),
    ];
    if !session.is_authenticated() {
        items.push(NavItem::new("Se connecter", AppRoute::Login));
        items.push(NavItem::new("S'inscrire", AppRoute::Register));
        return items;
    }
    items.push(NavItem::new("Mon profil", AppRoute::Profile));
    match session.role {
        Some(Role::Teacher) => {
            items.push(NavItem::new("Dashboard enseignant", AppRoute::TeacherDashboard))
        }
        Some(Role::Student) | None => {}
    }
    items
}

/// 个人页中按角色列出的功能入口
pub fn profile_sections(role: Role) -> Vec<NavItem> {
    match role {
        Role::Student => vec![
            NavItem::new("Exercices", AppRoute::Exercises),
            NavItem::new("Soumettre une réponse", AppRoute::Submit),
            NavItem::new("Mes soumissions", AppRoute::Submissions),
            NavItem::new("Mes performances", AppRoute::StudentPerformance),
        ],
        Role::Teacher => vec![
            NavItem::new("Exercices", AppRoute::Exercises),
            NavItem::new("Tableau de bord", AppRoute::TeacherDashboard),
            NavItem::new("Statistiques", AppRoute::TeacherStatistics),
        ],
    }
}
